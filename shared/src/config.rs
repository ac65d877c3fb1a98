use std::time::Duration;

// =========================================================
// 常量定义
// =========================================================

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// =========================================================
// 运行时配置
// =========================================================

/// API 客户端配置
///
/// 构建期通过环境变量 `EVRENT_API_URL` / `EVRENT_API_TIMEOUT_MS` 注入，缺省回落到默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout,
        }
    }

    /// 读取构建期环境变量
    pub fn from_env() -> Self {
        Self::from_values(option_env!("EVRENT_API_URL"), option_env!("EVRENT_API_TIMEOUT_MS"))
    }

    fn from_values(url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let base_url = url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        let timeout_ms = timeout_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self::new(base_url, Duration::from_millis(timeout_ms))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let cfg = ClientConfig::from_values(None, None);
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let cfg = ClientConfig::from_values(Some("https://api.example.com/api///"), Some("2500"));
        assert_eq!(cfg.base_url, "https://api.example.com/api");
        assert_eq!(cfg.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let cfg = ClientConfig::from_values(Some("  "), Some("soon"));
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.timeout.as_millis() as u64, DEFAULT_TIMEOUT_MS);
    }
}
