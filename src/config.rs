use std::env;
use std::time::Duration;

pub const DEFAULT_REQUEUE_AFTER: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: Option<String>,
    pub log_level: String,
    /// Namespaces every Redis key this crate writes.
    pub tenant_key: String,
    /// Delay between two polls of a phase hook that is not done yet.
    pub requeue_after: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            log_level: "info".to_string(),
            tenant_key: "global".to_string(),
            requeue_after: DEFAULT_REQUEUE_AFTER,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tenant_key: match env::var("TENANT_KEY") {
                Ok(s) if !s.is_empty() => s,
                _ => "global".to_string(),
            },
            requeue_after: env::var("HOOK_REQUEUE_AFTER")
                .ok()
                .and_then(|s| humantime::parse_duration(&s).ok())
                .unwrap_or(DEFAULT_REQUEUE_AFTER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::remove_var("REDIS_URL");
        env::remove_var("LOG_LEVEL");
        env::set_var("TENANT_KEY", "");
        env::remove_var("HOOK_REQUEUE_AFTER");

        let config = Config::from_env();
        assert!(config.redis_url.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tenant_key, "global");
        assert_eq!(config.requeue_after, Duration::from_secs(10));
    }

    #[test]
    fn test_config_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REDIS_URL", "redis://localhost:6379");
        env::set_var("LOG_LEVEL", "debug");
        env::set_var("TENANT_KEY", "team-a");
        env::set_var("HOOK_REQUEUE_AFTER", "1m 30s");

        let config = Config::from_env();
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.tenant_key, "team-a");
        assert_eq!(config.requeue_after, Duration::from_secs(90));

        env::remove_var("REDIS_URL");
        env::remove_var("LOG_LEVEL");
        env::remove_var("TENANT_KEY");
        env::remove_var("HOOK_REQUEUE_AFTER");
    }

    #[test]
    fn test_invalid_requeue_falls_back_to_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HOOK_REQUEUE_AFTER", "soon");

        let config = Config::from_env();
        assert_eq!(config.requeue_after, DEFAULT_REQUEUE_AFTER);

        env::remove_var("HOOK_REQUEUE_AFTER");
    }
}
