use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values can fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = or_default("LUMIZO_API_BASE_URL", "http://localhost:5000/api");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(invalid(
            "LUMIZO_API_BASE_URL",
            format!("\"{api_base_url}\" must start with http:// or https://"),
        ));
    }

    let env = parse_environment(&or_default("LUMIZO_ENV", "development"));
    let log_level = or_default("LUMIZO_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("LUMIZO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LUMIZO_USER_AGENT", "lumizo/0.1 (catalog-client)");
    let max_retries = parse_u32("LUMIZO_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("LUMIZO_RETRY_BACKOFF_BASE_MS", "500")?;
    let retry_backoff_multiplier = parse_u32("LUMIZO_RETRY_BACKOFF_MULTIPLIER", "2")?;
    if retry_backoff_multiplier == 0 {
        return Err(invalid(
            "LUMIZO_RETRY_BACKOFF_MULTIPLIER",
            "must be at least 1".to_owned(),
        ));
    }
    let retry_max_delay_ms = parse_u64("LUMIZO_RETRY_MAX_DELAY_MS", "30000")?;

    let page_limit = or_default("LUMIZO_PAGE_LIMIT", "12")
        .parse::<i64>()
        .map_err(|e| invalid("LUMIZO_PAGE_LIMIT", e.to_string()))?;
    if page_limit < 1 {
        return Err(invalid(
            "LUMIZO_PAGE_LIMIT",
            format!("{page_limit} is not a positive page size"),
        ));
    }

    let cart_path = PathBuf::from(or_default("LUMIZO_CART_PATH", "./.lumizo/cart.json"));
    let fallback_path = lookup("LUMIZO_FALLBACK_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let image_timeout_secs = parse_u64("LUMIZO_IMAGE_TIMEOUT_SECS", "10")?;
    let company_name = or_default("LUMIZO_COMPANY_NAME", "Lumizo");

    Ok(AppConfig {
        api_base_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        retry_backoff_multiplier,
        retry_max_delay_ms,
        page_limit,
        cart_path,
        fallback_path,
        image_timeout_secs,
        company_name,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::path::PathBuf;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("development"), Environment::Development);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_defaults_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:5000/api");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "lumizo/0.1 (catalog-client)");
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.retry_backoff_base_ms, 500);
        assert_eq!(cfg.retry_backoff_multiplier, 2);
        assert_eq!(cfg.retry_max_delay_ms, 30_000);
        assert_eq!(cfg.page_limit, 12);
        assert_eq!(cfg.cart_path, PathBuf::from("./.lumizo/cart.json"));
        assert!(cfg.fallback_path.is_none());
        assert_eq!(cfg.image_timeout_secs, 10);
        assert_eq!(cfg.company_name, "Lumizo");
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_API_BASE_URL", "https://shop.lumizo.in/api");
        map.insert("LUMIZO_ENV", "production");
        map.insert("LUMIZO_MAX_RETRIES", "0");
        map.insert("LUMIZO_PAGE_LIMIT", "24");
        map.insert("LUMIZO_FALLBACK_PATH", "./config/fallback.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_base_url, "https://shop.lumizo.in/api");
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.page_limit, 24);
        assert_eq!(
            cfg.fallback_path,
            Some(PathBuf::from("./config/fallback.yaml"))
        );
    }

    #[test]
    fn build_app_config_reads_retry_schedule() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_RETRY_BACKOFF_MULTIPLIER", "3");
        map.insert("LUMIZO_RETRY_MAX_DELAY_MS", "8000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.retry_backoff_multiplier, 3);
        assert_eq!(cfg.retry_max_delay_ms, 8_000);
    }

    #[test]
    fn build_app_config_rejects_zero_backoff_multiplier() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_RETRY_BACKOFF_MULTIPLIER", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUMIZO_RETRY_BACKOFF_MULTIPLIER"),
            "expected InvalidEnvVar(LUMIZO_RETRY_BACKOFF_MULTIPLIER), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_ignores_blank_fallback_path() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_FALLBACK_PATH", "  ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.fallback_path.is_none());
    }

    #[test]
    fn build_app_config_rejects_non_http_base_url() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_API_BASE_URL", "localhost:5000/api");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUMIZO_API_BASE_URL"),
            "expected InvalidEnvVar(LUMIZO_API_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUMIZO_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(LUMIZO_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_page_limit() {
        let mut map = HashMap::new();
        map.insert("LUMIZO_PAGE_LIMIT", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUMIZO_PAGE_LIMIT"),
            "expected InvalidEnvVar(LUMIZO_PAGE_LIMIT), got: {result:?}"
        );
    }
}
