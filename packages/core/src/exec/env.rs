//! Environment overrides for executed commands

use std::collections::BTreeMap;

/// Environment variables set on every command an executor runs
///
/// Built once from the settings file and handed to each executor; the
/// environment of the tpux process itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandEnv {
    vars: BTreeMap<String, String>,
}

impl CommandEnv {
    /// Create from a name/value map
    ///
    /// Names that are not valid shell identifiers are dropped with a warning,
    /// since they could not be exported on remote hosts.
    pub fn new(vars: BTreeMap<String, String>) -> Self {
        let vars = vars
            .into_iter()
            .filter(|(name, _)| {
                let valid = is_valid_name(name);
                if !valid {
                    tracing::warn!("Ignoring invalid environment variable name: {name:?}");
                }
                valid
            })
            .collect();
        Self { vars }
    }

    /// Keep package managers from prompting
    pub fn noninteractive() -> Self {
        Self::new(BTreeMap::from([(
            "DEBIAN_FRONTEND".to_string(),
            "noninteractive".to_string(),
        )]))
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Shell prefix that exports the overrides before a remote command
    ///
    /// Empty when there are no overrides.
    pub fn export_prefix(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("export {name}={} && ", shell_quote(value)))
            .collect()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Single-quote `value` for POSIX shells
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
