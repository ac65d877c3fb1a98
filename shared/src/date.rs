//! 时间处理模块
//!
//! 后端时间字段格式不统一：有带时区的 RFC 3339，也有不带时区的 ISO 本地时间，
//! 偶尔只有日期。这里统一解析为本地 `NaiveDateTime`，并提供展示格式。

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

// =========================================================
// 常量定义
// =========================================================

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// 解析与格式化
// =========================================================

/// 宽松解析时间字符串，失败返回 `None`
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    parse_date(s).map(|d| d.and_time(NaiveTime::MIN))
}

/// 解析 `YYYY-MM-DD`（日期输入框的值）
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_display(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// 可选时间的展示，缺省显示 `-`
pub fn format_optional(dt: Option<&NaiveDateTime>) -> String {
    dt.map(format_display).unwrap_or_else(|| "-".to_string())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// =========================================================
// Serde 辅助
// =========================================================

/// `Option<NaiveDateTime>` 的宽松序列化
///
/// 反序列化时无法识别的值（包括 `null` 和非字符串）一律视为 `None`，
/// 避免单条脏数据导致整张列表解析失败。
pub mod lenient {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().and_then(super::parse_datetime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_variants() {
        let dt = parse_datetime("2024-05-01T08:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 30));

        let dt = parse_datetime("2024-05-01T08:30:00.1234567").unwrap();
        assert_eq!(dt.day(), 1);

        let dt = parse_datetime("2024-05-01 23:59:59").unwrap();
        assert_eq!(dt.second(), 59);
    }

    #[test]
    fn test_parse_rfc3339_and_date_only() {
        assert!(parse_datetime("2024-05-01T08:30:00Z").is_some());
        assert!(parse_datetime("2024-05-01T08:30:00+07:00").is_some());

        let dt = parse_datetime("2024-05-01").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_display() {
        let dt = parse_datetime("2024-05-01T08:05:00").unwrap();
        assert_eq!(format_display(&dt), "01/05/2024 08:05");
        assert_eq!(format_optional(None), "-");
    }

    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(default, with = "lenient")]
        at: Option<NaiveDateTime>,
    }

    #[test]
    fn test_lenient_serde() {
        let h: Holder = serde_json::from_str(r#"{"at":"2024-05-01T08:00:00"}"#).unwrap();
        assert!(h.at.is_some());
        let h: Holder = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(h.at.is_none());
        let h: Holder = serde_json::from_str(r#"{"at":42}"#).unwrap();
        assert!(h.at.is_none());
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.at.is_none());
    }
}
