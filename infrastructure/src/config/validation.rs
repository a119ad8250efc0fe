//! Structured configuration issues reported by [`FileConfig::validate`](super::FileConfig::validate)

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value cannot be used; the built-in default applies instead.
    Error,
    /// The value is usable but probably not what was meant.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    OutOfRange {
        field: String,
    },
    InvalidUrl {
        field: String,
    },
    UnknownSource {
        name: String,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn out_of_range(field: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::OutOfRange {
                field: field.to_string(),
            },
            message,
        }
    }

    pub(crate) fn invalid_url(field: &str, url: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::InvalidUrl {
                field: field.to_string(),
            },
            message: format!("{field}: '{url}' is not a valid http(s) URL ({reason})"),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}: {}", self.message)
    }
}
