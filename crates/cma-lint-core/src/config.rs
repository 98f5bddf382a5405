//! Configuration types for cma-lint.

use crate::types::{RuleCode, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for cma-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Names the message rules look for.
    #[serde(default)]
    pub checks: CheckConfig,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or names no constructor or
    /// marker.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values no rule can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checks.constructors.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: "checks.constructors must name at least one constructor".to_string(),
            });
        }
        if self.checks.markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: "checks.markers must name at least one marker".to_string(),
            });
        }
        for key in self.rules.keys() {
            if RuleCode::lookup(key).is_none() {
                tracing::warn!("Unknown rule in configuration: {}", key);
            }
        }
        Ok(())
    }

    fn rule_config(&self, rule: RuleCode) -> Option<&RuleConfig> {
        self.rules
            .iter()
            .find(|(key, _)| RuleCode::lookup(key) == Some(rule))
            .map(|(_, config)| config)
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule: RuleCode) -> bool {
        self.rule_config(rule)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule: RuleCode) -> Option<Severity> {
        self.rule_config(rule).and_then(|c| c.severity)
    }

    /// Disables every rule not listed in `selected`.
    pub fn restrict_to(&mut self, selected: &[RuleCode]) {
        for rule in RuleCode::ALL {
            if selected.contains(&rule) {
                continue;
            }
            let key = self
                .rules
                .keys()
                .find(|key| RuleCode::lookup(key) == Some(rule))
                .cloned()
                .unwrap_or_else(|| rule.name().to_string());
            self.rules.entry(key).or_default().enabled = Some(false);
        }
    }
}

/// Names and punctuation the message rules work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Constructor names whose message argument is checked, matched against
    /// the last component of the callee.
    pub constructors: Vec<String>,

    /// Call names that count as wrapping a message for translation.
    pub markers: Vec<String>,

    /// Character every message must end with.
    pub terminal_punctuation: char,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            constructors: vec!["ValidationError".to_string()],
            markers: vec!["_".to_string()],
            terminal_punctuation: '.',
        }
    }
}

impl CheckConfig {
    /// Returns true if `name` is a configured constructor.
    #[must_use]
    pub fn is_constructor(&self, name: &str) -> bool {
        self.constructors.iter().any(|c| c == name)
    }

    /// Returns true if `name` is a configured marker.
    #[must_use]
    pub fn is_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m == name)
    }

    /// The marker named in messages.
    #[must_use]
    pub fn primary_marker(&self) -> &str {
        self.markers.first().map_or("_", String::as_str)
    }

    /// How the terminal punctuation is spelled in messages.
    #[must_use]
    pub fn punctuation_label(&self) -> String {
        match self.terminal_punctuation {
            '.' => "dot".to_string(),
            other => format!("`{other}`"),
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether `# noqa` comments suppress findings.
    #[serde(default = "default_true")]
    pub honor_noqa: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            respect_gitignore: true,
            honor_noqa: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Values that parse but cannot be used.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.analyzer.honor_noqa);
        assert!(config.rules.is_empty());
        assert!(config.checks.is_constructor("ValidationError"));
        assert!(config.checks.is_marker("_"));
        assert_eq!(config.checks.terminal_punctuation, '.');
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[checks]
constructors = ["ValidationError", "FormError"]
markers = ["_", "gettext_lazy"]
terminal_punctuation = "!"

[analyzer]
root = "./app"
exclude = ["**/migrations/**"]

[rules.message-not-wrapped]
enabled = false

[rules.CMA100]
severity = "warning"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./app"));
        assert!(config.checks.is_constructor("FormError"));
        assert!(config.checks.is_marker("gettext_lazy"));
        assert_eq!(config.checks.punctuation_label(), "`!`");
        assert!(!config.is_rule_enabled(RuleCode::MessageNotWrapped));
        assert!(config.is_rule_enabled(RuleCode::MissingTrailingComma));
        assert_eq!(
            config.rule_severity(RuleCode::MissingTrailingComma),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_rejects_empty_constructors() {
        let err = Config::parse("[checks]\nconstructors = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = Config::parse("[checks\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_restrict_to() {
        let mut config = Config::default();
        config.restrict_to(&[RuleCode::MissingTrailingComma]);
        assert!(config.is_rule_enabled(RuleCode::MissingTrailingComma));
        assert!(!config.is_rule_enabled(RuleCode::MessageNotWrapped));
        assert!(!config.is_rule_enabled(RuleCode::MessageMissingTerminalPunctuation));
    }
}
