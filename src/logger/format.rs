//! Access log format module
//!
//! Supports:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Access log layout, chosen once from configuration.
///
/// Any value other than the three named layouts is taken as a custom pattern.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum AccessLogFormat {
    #[default]
    Combined,
    Common,
    Json,
    Custom(String),
}

impl From<String> for AccessLogFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            _ => Self::Custom(value),
        }
    }
}

/// Borrowed view of an entry, serialized for the `json` layout
#[derive(Serialize)]
struct JsonRecord<'a> {
    remote_addr: &'a str,
    time: String,
    method: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    http_version: &'a str,
    status: u16,
    body_bytes: usize,
    referer: Option<&'a str>,
    user_agent: Option<&'a str>,
    request_time_us: u64,
}

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.common_line(),
            AccessLogFormat::Json => self.json_line(),
            AccessLogFormat::Custom(pattern) => self.custom_line(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn json_line(&self) -> String {
        let record = JsonRecord {
            remote_addr: &self.remote_addr,
            time: self.time.to_rfc3339(),
            method: &self.method,
            path: &self.path,
            query: self.query.as_deref(),
            http_version: &self.http_version,
            status: self.status,
            body_bytes: self.body_bytes,
            referer: self.referer.as_deref(),
            user_agent: self.user_agent.as_deref(),
            request_time_us: self.request_time_us,
        };
        serde_json::to_string(&record)
            .unwrap_or_else(|e| format!(r#"{{"error":"unserializable access log entry: {e}"}}"#))
    }

    /// Substitute nginx-style variables into `pattern`.
    ///
    /// Supported: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`, `$request_time` (seconds, 3 decimals).
    fn custom_line(&self, pattern: &str) -> String {
        let request_uri = self.request_uri();
        let request_line = format!("{} {request_uri} HTTP/{}", self.method, self.http_version);
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and $request_uri before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &request_uri)
            .replace("$request", &request_line)
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/api/v1/tr/translate".to_string(),
        );
        entry.query = Some("lang=en-ru".to_string());
        entry.status = 302;
        entry.body_bytes = 14;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("Mozilla/5.0 \"quoted\"".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(&AccessLogFormat::Combined);
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /api/v1/tr/translate?lang=en-ru HTTP/1.1\" 302 14"));
        assert!(log.contains("\"https://example.com\""));
        assert!(log.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format(&AccessLogFormat::Common);
        assert!(log.contains("\"GET /api/v1/tr/translate?lang=en-ru HTTP/1.1\" 302 14"));
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format(&AccessLogFormat::Json);
        assert!(log.contains(r#""remote_addr":"192.168.1.1""#));
        assert!(log.contains(r#""query":"lang=en-ru""#));
        assert!(log.contains(r#""status":302"#));
        assert!(log.contains(r#""user_agent":"Mozilla/5.0 \"quoted\"""#));
        assert!(log.contains(r#""request_time_us":1500"#));
    }

    #[test]
    fn test_json_missing_fields_are_null() {
        let entry = AccessLogEntry::new("::1".to_string(), "GET".to_string(), "/".to_string());
        let log = entry.format(&AccessLogFormat::Json);
        assert!(log.contains(r#""query":null"#));
        assert!(log.contains(r#""referer":null"#));
    }

    #[test]
    fn test_json_escapes_control_characters() {
        let mut entry = create_test_entry();
        entry.user_agent = Some("bell\u{7}agent".to_string());
        let log = entry.format(&AccessLogFormat::Json);
        assert!(log.contains(r#""user_agent":"bell\u0007agent""#), "got: {log}");

        let parsed: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(parsed["user_agent"], "bell\u{7}agent");
        assert_eq!(parsed["status"], 302);
    }

    #[test]
    fn test_format_custom() {
        let format = AccessLogFormat::from(
            "$remote_addr $request_method $request_uri $status $request_time".to_string(),
        );
        assert!(matches!(format, AccessLogFormat::Custom(_)));

        let mut entry = create_test_entry();
        entry.request_time_us = 250_000;
        assert_eq!(entry.format(&format), "192.168.1.1 GET /api/v1/tr/translate?lang=en-ru 302 0.250");
    }

    #[test]
    fn test_custom_request_line_and_missing_headers() {
        let entry = AccessLogEntry::new("::1".to_string(), "POST".to_string(), "/".to_string());
        let format = AccessLogFormat::from("\"$request\" $http_referer $body_bytes_sent".to_string());
        assert_eq!(entry.format(&format), "\"POST / HTTP/1.1\" - 0");
    }

    #[test]
    fn test_named_layouts_are_not_custom() {
        assert_eq!(AccessLogFormat::from("json".to_string()), AccessLogFormat::Json);
        assert_eq!(AccessLogFormat::from("common".to_string()), AccessLogFormat::Common);
        assert_eq!(AccessLogFormat::from("combined".to_string()), AccessLogFormat::Combined);
    }
}
