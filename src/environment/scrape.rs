//! Extraction of credentials from command output and configuration text.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::ADMIN_PASSWORD_MARKER;

const CLIENT_ID_MARKER: &str = "client_id:";
const CLIENT_SECRET_MARKER: &str = "client_secret:";

/// Extracts the ETEngine admin password from `bin/setup` output.
///
/// The password is the rest of the marker line, trimmed, with a trailing
/// table border (`|`) removed.
#[must_use]
pub fn extract_admin_password(stdout: &str) -> Option<String> {
    let start = stdout.find(ADMIN_PASSWORD_MARKER)? + ADMIN_PASSWORD_MARKER.len();
    let rest = &stdout[start..];
    let line = rest.lines().next().unwrap_or("");

    let password = line.trim();
    let password = password.strip_suffix('|').unwrap_or(password).trim();

    (!password.is_empty()).then(|| password.to_string())
}

/// OAuth client credentials linking ETModel to ETEngine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
}

impl IdentityInfo {
    /// Whether both credentials were found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

fn value_after_colon(line: &str) -> Option<String> {
    line.split(':').nth(1).map(|v| v.trim().to_string())
}

/// Scans configuration text for `client_id:` and `client_secret:` lines.
///
/// The last matching line wins.
#[must_use]
pub fn extract_identity_info(text: &str) -> IdentityInfo {
    let mut info = IdentityInfo::default();
    for line in text.lines() {
        if line.contains(CLIENT_ID_MARKER) {
            info.client_id = value_after_colon(line);
        }
        if line.contains(CLIENT_SECRET_MARKER) {
            info.client_secret = value_after_colon(line);
        }
    }
    info
}

/// Rewrites the credential lines of a `settings.local.yml` text.
///
/// Returns the new text and the number of rewritten lines. Credentials that
/// are `None` leave their lines untouched.
#[must_use]
pub fn rewrite_settings(text: &str, identity: &IdentityInfo) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut changed = 0;

    for line in text.split_inclusive('\n') {
        let ending = if line.ends_with("\r\n") {
            "\r\n"
        } else if line.ends_with('\n') {
            "\n"
        } else {
            ""
        };

        let replacement = match (&identity.client_id, &identity.client_secret) {
            (Some(id), _) if line.contains(CLIENT_ID_MARKER) => {
                Some(format!("  {CLIENT_ID_MARKER} {id}"))
            }
            (_, Some(secret)) if line.contains(CLIENT_SECRET_MARKER) => {
                Some(format!("  {CLIENT_SECRET_MARKER} {secret}"))
            }
            _ => None,
        };

        match replacement {
            Some(new_line) => {
                out.push_str(&new_line);
                out.push_str(ending);
                changed += 1;
            }
            None => out.push_str(line),
        }
    }

    (out, changed)
}

/// Writes `identity` into an existing `settings.local.yml`.
pub fn update_settings_file(path: &Path, identity: &IdentityInfo) -> Result<usize> {
    if !path.exists() {
        anyhow::bail!("Settings file not found: {}", path.display());
    }

    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (updated, changed) = rewrite_settings(&text, identity);
    fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_admin_password() {
        let stdout = "Seeding...\n| Created admin user admin@example.org with password: s3cr3t |\nDone\n";
        assert_eq!(extract_admin_password(stdout), Some("s3cr3t".to_string()));
    }

    #[test]
    fn test_extract_admin_password_without_border() {
        let stdout = "Created admin user admin@example.org with password:   abc  ";
        assert_eq!(extract_admin_password(stdout), Some("abc".to_string()));
    }

    #[test]
    fn test_extract_admin_password_missing() {
        assert_eq!(extract_admin_password("nothing here"), None);
        assert_eq!(
            extract_admin_password("Created admin user admin@example.org with password: |"),
            None
        );
    }

    #[test]
    fn test_extract_identity_info_last_line_wins() {
        let text = "client_id: first\nfoo: bar\nclient_id: second\nclient_secret: xyz\n";
        let info = extract_identity_info(text);

        assert_eq!(info.client_id.as_deref(), Some("second"));
        assert_eq!(info.client_secret.as_deref(), Some("xyz"));
        assert!(info.is_complete());
    }

    #[test]
    fn test_extract_identity_info_takes_first_field() {
        let info = extract_identity_info("client_id: abc:def");
        assert_eq!(info.client_id.as_deref(), Some("abc"));
        assert!(!info.is_complete());
    }

    #[test]
    fn test_rewrite_settings() {
        let text = "identity:\n  client_id: old\n  client_secret: old\nother: 1\n";
        let identity = IdentityInfo {
            client_id: Some("new_id".to_string()),
            client_secret: Some("new_secret".to_string()),
        };

        let (updated, changed) = rewrite_settings(text, &identity);
        assert_eq!(changed, 2);
        assert_eq!(
            updated,
            "identity:\n  client_id: new_id\n  client_secret: new_secret\nother: 1\n"
        );
    }

    #[test]
    fn test_update_settings_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let err = update_settings_file(
            &temp_dir.path().join("settings.local.yml"),
            &IdentityInfo::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Settings file not found"));
    }

    #[test]
    fn test_update_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.local.yml");
        fs::write(&path, "client_id: a\n").unwrap();

        let identity = IdentityInfo {
            client_id: Some("b".to_string()),
            client_secret: None,
        };
        assert_eq!(update_settings_file(&path, &identity).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "  client_id: b\n");
    }
}
