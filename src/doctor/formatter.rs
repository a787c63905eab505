//! Output formatting for environment check results.
//!
//! Terminal output uses visual indicators (✓/✗/⚠) with a hint for every
//! missing item and a summary line; JSON output is meant for scripts.

use serde::Serialize;
use std::fmt::Write;

use crate::doctor::{DependencyStatus, ToolStatus};

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON output
    Json,
}

/// JSON output structure for doctor results.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Overall health status
    pub status: String,
    /// Number of successful checks
    pub passed: usize,
    /// Number of failed checks
    pub failed: usize,
    /// Number of unknown checks
    pub unknown: usize,
    /// Individual check results
    pub checks: Vec<JsonCheck>,
}

/// JSON representation of a single check.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCheck {
    /// Check name
    pub name: String,
    /// Status (available, missing, unknown)
    pub status: ToolStatus,
    /// Version string if detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Status message
    pub message: String,
    /// How to fix a missing item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// Formatter for environment check results.
pub struct DoctorFormatter {
    format: OutputFormat,
}

impl DoctorFormatter {
    /// Creates a formatter for terminal output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_format(OutputFormat::Terminal)
    }

    /// Creates a formatter for the given output format.
    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats check results.
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => Self::format_terminal(statuses),
            OutputFormat::Json => Self::format_json(statuses),
        }
    }

    fn count(statuses: &[DependencyStatus], status: ToolStatus) -> usize {
        statuses.iter().filter(|s| s.status == status).count()
    }

    fn format_terminal(statuses: &[DependencyStatus]) -> String {
        let mut output = String::new();

        output.push_str("ETHelper Environment Status\n");
        output.push_str("═══════════════════════════\n\n");

        for status in statuses {
            let (symbol, status_text) = match status.status {
                ToolStatus::Available => ("✓", "OK"),
                ToolStatus::Missing => ("✗", "MISSING"),
                ToolStatus::Unknown => ("⚠", "CHECK"),
            };

            // ✓ docker-compose ...... OK (v2.24.6)
            let name_width: usize = 20;
            let dots = ".".repeat(name_width.saturating_sub(status.name.len()));
            let _ = write!(output, "{} {}{} {}", symbol, status.name, dots, status_text);
            if let Some(version) = &status.version {
                let _ = write!(output, " (v{version})");
            }
            output.push('\n');

            if status.status != ToolStatus::Available {
                let _ = writeln!(output, "    {}", status.message);
                if let Some(hint) = hint_for(&status.name) {
                    let _ = writeln!(output, "    Fix: {hint}");
                }
            }
        }

        let passed = Self::count(statuses, ToolStatus::Available);
        let failed = Self::count(statuses, ToolStatus::Missing);
        let unknown = Self::count(statuses, ToolStatus::Unknown);

        output.push_str("\n───────────────────────────\n");
        let _ = write!(output, "Summary: {passed} passed");
        if failed > 0 {
            let _ = write!(output, ", {failed} failed");
        }
        if unknown > 0 {
            let _ = write!(output, ", {unknown} to check");
        }
        output.push('\n');

        if failed == 0 && unknown == 0 {
            output.push_str("\n✓ Environment is ready.\n");
        } else if failed > 0 {
            output.push_str("\n✗ Some requirements are missing. Fix them and run 'doctor' again.\n");
        } else {
            output.push_str("\n⚠ Review the warnings above.\n");
        }

        output
    }

    fn format_json(statuses: &[DependencyStatus]) -> String {
        let passed = Self::count(statuses, ToolStatus::Available);
        let failed = Self::count(statuses, ToolStatus::Missing);
        let unknown = Self::count(statuses, ToolStatus::Unknown);

        let overall_status = if failed == 0 && unknown == 0 {
            "ready"
        } else if failed > 0 {
            "missing_dependencies"
        } else {
            "warnings"
        };

        let checks = statuses
            .iter()
            .map(|s| JsonCheck {
                name: s.name.clone(),
                status: s.status,
                version: s.version.clone(),
                message: s.message.clone(),
                hint: if s.status == ToolStatus::Available {
                    None
                } else {
                    hint_for(&s.name)
                },
            })
            .collect();

        let json_output = JsonOutput {
            status: overall_status.to_string(),
            passed,
            failed,
            unknown,
            checks,
        };

        serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Remedy for a failed check.
fn hint_for(name: &str) -> Option<&'static str> {
    match name {
        "docker-compose" => Some("Install Docker Desktop or the docker-compose plugin"),
        "Data root" => Some("Run from the ETHelper checkout or set paths.data_root in config.toml"),
        "ETLocal" => Some("git clone https://github.com/quintel/etlocal.git next to ETHelper"),
        "ETEngine" => Some("git clone https://github.com/quintel/etengine.git next to ETHelper"),
        "ETModel" => Some("git clone https://github.com/quintel/etmodel.git next to ETHelper"),
        _ => None,
    }
}
