use crate::record::{LogRecord, Severity};
use tracing::debug;

/// Where a record goes: destination topic and partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub topic: String,
    pub key: String,
}

/// Maps records to topics by severity and application.
///
/// Non-fatal levels fan out per application (`logs.info.api-gateway`);
/// every fatal event lands in the single `logs.fatal` topic.
#[derive(Debug, Clone)]
pub struct Router {
    prefix: String,
}

impl Router {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn route(&self, record: &LogRecord) -> Route {
        Route {
            topic: self.topic_for(record.level.as_str(), &record.application.name),
            key: partition_key(&record.application.name, &record.trace_id),
        }
    }

    /// Topic for a raw level label. Labels that are not a known severity go
    /// to `<prefix>.unknown`.
    pub fn topic_for(&self, level: &str, app_name: &str) -> String {
        match level.parse::<Severity>() {
            Ok(Severity::Fatal) => format!("{}.fatal", self.prefix),
            Ok(severity) => format!(
                "{}.{}.{}",
                self.prefix,
                severity.as_str().to_lowercase(),
                app_name
            ),
            Err(_) => {
                debug!("Unrecognized level '{}' for {}", level, app_name);
                format!("{}.unknown", self.prefix)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("logs")
    }
}

/// `<app>:<first 8 chars of trace_id>`.
pub fn partition_key(app_name: &str, trace_id: &str) -> String {
    let suffix = trace_id.get(..8).unwrap_or(trace_id);
    format!("{}:{}", app_name, suffix)
}
