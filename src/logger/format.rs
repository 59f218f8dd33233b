//! Access log formatting
//!
//! Formats understood by [`AccessLogEntry::format`]:
//! - `common` (Common Log Format)
//! - `combined` (common plus referer and user agent)
//! - `json` (one object per line)
//! - anything else is treated as a pattern with `$variable` substitution

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Raw request path, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// File length for streamed bodies, `None` when unknown
    pub body_bytes: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "json" => self.format_json(),
            pattern => self.format_pattern(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    fn bytes_field(&self) -> String {
        self.body_bytes
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }

    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.bytes_field(),
        )
    }

    fn format_json(&self) -> String {
        let opt = |v: &Option<String>| {
            v.as_deref()
                .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_json(s)))
        };
        let bytes = self
            .body_bytes
            .map_or_else(|| "null".to_string(), |n| n.to_string());

        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","query":{},"http_version":"{}","status":{},"body_bytes":{},"referer":{},"user_agent":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            opt(&self.query),
            escape_json(&self.http_version),
            self.status,
            bytes,
            opt(&self.referer),
            opt(&self.user_agent),
            self.request_time_us,
        )
    }

    /// Substitute `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time`, `$status`,
    /// `$body_bytes_sent`, `$http_referer` and `$http_user_agent`.
    fn format_pattern(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        // Longest names first so `$request` does not eat `$request_time`
        let vars: [(&str, String); 11] = [
            ("$body_bytes_sent", self.bytes_field()),
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".to_string())),
            ("$request_method", self.method.clone()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".to_string())),
            ("$request_time", format!("{seconds:.3}")),
            ("$remote_addr", self.remote_addr.clone()),
            ("$request_uri", self.request_uri()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
        ];

        // One pass over the pattern: substituted values are never rescanned
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match vars.iter().find(|(name, _)| rest.starts_with(name)) {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &rest[name.len()..];
                }
                None => {
                    out.push('$');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.7:51234".to_string(),
            "GET".to_string(),
            "/docs/index.html".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 404;
        entry.body_bytes = Some(9);
        entry.user_agent = Some("curl/8.5".to_string());
        entry.request_time_us = 2600;
        entry
    }

    #[test]
    fn test_format_common() {
        let log = entry().format("common");
        assert!(log.starts_with("10.0.0.7:51234 - - ["));
        assert!(log.ends_with("\"GET /docs/index.html?v=2 HTTP/1.1\" 404 9"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_combined() {
        let log = entry().format("combined");
        assert!(log.ends_with("404 9 \"-\" \"curl/8.5\""));
    }

    #[test]
    fn test_unknown_size_renders_dash() {
        let mut e = entry();
        e.body_bytes = None;
        assert!(e.format("common").ends_with(" 404 -"));
        assert!(e.format("json").contains(r#""body_bytes":null"#));
    }

    #[test]
    fn test_format_json() {
        let mut e = entry();
        e.path = "/a\"b".to_string();
        let log = e.format("json");
        assert!(log.contains(r#""path":"/a\"b""#));
        assert!(log.contains(r#""status":404"#));
        assert!(log.contains(r#""referer":null"#));
    }

    #[test]
    fn test_format_pattern() {
        let log = entry().format("$request_method $request_uri -> $status in $request_time");
        assert_eq!(log, "GET /docs/index.html?v=2 -> 404 in 0.003");
    }

    #[test]
    fn test_pattern_values_are_not_reexpanded() {
        let mut e = entry();
        e.path = "/$http_user_agent".to_string();
        let log = e.format("$request_uri $http_user_agent");
        assert_eq!(log, "/$http_user_agent?v=2 curl/8.5");
    }

    #[test]
    fn test_pattern_keeps_unknown_and_trailing_dollar() {
        let log = entry().format("$status $nope cost $");
        assert_eq!(log, "404 $nope cost $");
    }
}
