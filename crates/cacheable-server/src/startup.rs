//! Server startup utilities.

use cacheable_cache::TtlResolver;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ______           __          __    __
  / ____/___ ______/ /_  ___  _/ /_  / /__
 / /   / __ `/ ___/ __ \/ _ \/ __ \/ / _ \
/ /___/ /_/ / /__/ / / /  __/ /_/ / /  __/
\____/\__,_/\___/_/ /_/\___/_.___/_/\___/
    "#);
}

/// Prints the listen address and the configured cache names.
pub fn print_startup_info(addr: &str, ttl: &TtlResolver) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("HTTP:      http://{}", addr);
    info!("Health:    http://{}/health", addr);
    info!("Hello:     http://{}/hello", addr);
    for name in ttl.configure_all().keys() {
        if let Some(policy) = ttl.policy(name) {
            info!("Cache:     {} ({} {})", name, policy.time_to_live, policy.unit);
        }
    }
    info!("Default:   {}s", ttl.default_ttl().as_secs());
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheable_cache::CachePolicy;
    use cacheable_config::TimeUnit;
    use std::time::Duration;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let ttl = TtlResolver::new(true, 30, Duration::from_secs(300)).with_policy(
            "hello-world",
            CachePolicy {
                time_to_live: 2,
                unit: TimeUnit::Minutes,
            },
        );
        print_startup_info("0.0.0.0:8080", &ttl);
    }
}
