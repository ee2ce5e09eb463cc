use super::types::{Environment, Severity};

/// A fake service that records are attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub environment: Environment,
}

impl Application {
    pub fn new(name: impl Into<String>, environment: Environment) -> Self {
        Self {
            name: name.into(),
            environment,
        }
    }
}

/// Selection weight and message pool for one severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityProfile {
    pub severity: Severity,
    pub weight: u32,
    pub messages: Vec<String>,
}

impl SeverityProfile {
    fn new(severity: Severity, weight: u32, messages: &[&str]) -> Self {
        Self {
            severity,
            weight,
            messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Immutable lookup tables the synthesizer draws from.
///
/// Built once at startup and shared by reference; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub applications: Vec<Application>,
    pub severities: Vec<SeverityProfile>,
}

impl Catalog {
    pub fn new(applications: Vec<Application>, severities: Vec<SeverityProfile>) -> Self {
        Self {
            applications,
            severities,
        }
    }

    /// The five applications and five severities every deployment uses.
    pub fn standard() -> Self {
        let applications = vec![
            Application::new("web-frontend", Environment::Prod),
            Application::new("api-gateway", Environment::Prod),
            Application::new("user-service", Environment::Prod),
            Application::new("order-service", Environment::Staging),
            Application::new("payment-service", Environment::Prod),
        ];

        let severities = vec![
            SeverityProfile::new(
                Severity::Debug,
                5,
                &["Debugging connection", "Cache hit for key", "Entered function X"],
            ),
            SeverityProfile::new(
                Severity::Info,
                60,
                &["User login successful", "Processed request", "Service started"],
            ),
            SeverityProfile::new(
                Severity::Warn,
                25,
                &["High memory usage detected", "Slow response", "Rate limit near"],
            ),
            SeverityProfile::new(
                Severity::Error,
                8,
                &["DB connection failed", "Authentication failed", "Timeout error"],
            ),
            SeverityProfile::new(
                Severity::Fatal,
                2,
                &["Out of memory", "System crash", "Service shutdown unexpectedly"],
            ),
        ];

        Self::new(applications, severities)
    }

    pub fn application(&self, name: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.name == name)
    }

    pub fn messages_for(&self, severity: Severity) -> &[String] {
        self.severities
            .iter()
            .find(|profile| profile.severity == severity)
            .map(|profile| profile.messages.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
