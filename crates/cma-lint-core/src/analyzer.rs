//! Analyzer running checkers over discovered source files.

use crate::checker::{CheckError, Checker, CheckerBox, SourceUnit};
use crate::config::Config;
use crate::context::FileContext;
use crate::frontend::{Frontend, FrontendBox, FrontendError};
use crate::types::{Finding, LintResult, Violation};
use crate::utils::noqa;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the source tree.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// The frontend itself failed.
    #[error("Frontend error: {0}")]
    Frontend(FrontendError),

    /// A checker rejected the frontend's output.
    #[error("Check failed in {path}: {source}")]
    Check {
        /// Path to the file being checked.
        path: PathBuf,
        /// Underlying checker error.
        source: CheckError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// No frontend was registered.
    #[error("No frontend registered")]
    NoFrontend,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    frontend: Option<FrontendBox>,
    checkers: Vec<CheckerBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the frontend that parses source files.
    #[must_use]
    pub fn frontend<F: Frontend + 'static>(mut self, frontend: F) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Adds a checker to the analyzer.
    #[must_use]
    pub fn checker<C: Checker + 'static>(mut self, checker: C) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Adds a boxed checker to the analyzer.
    #[must_use]
    pub fn checker_box(mut self, checker: CheckerBox) -> Self {
        self.checkers.push(checker);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no frontend was set, an exclude pattern is not a
    /// valid glob, or the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let frontend = self.frontend.ok_or(AnalyzerError::NoFrontend)?;

        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        // Add default excludes if none specified
        if exclude_patterns.is_empty() {
            exclude_patterns.extend([
                "**/.venv/**".to_string(),
                "**/venv/**".to_string(),
                "**/.tox/**".to_string(),
            ]);
        }

        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            frontend,
            checkers: self.checkers,
            exclude_patterns,
            excludes,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    frontend: FrontendBox,
    checkers: Vec<CheckerBox>,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered checkers.
    #[must_use]
    pub fn checker_count(&self) -> usize {
        self.checkers.len()
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory that reported paths are relative to.
    fn base_dir(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        }
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// checker rejects a parsed file. Parse errors only fail the run when
    /// `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let content = std::fs::read_to_string(file_path)?;
            match self.analyze_source(file_path, &content) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes one in-memory source unit and returns its violations.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source does not parse, and
    /// [`AnalyzerError::Check`] if a checker rejects the parsed unit.
    pub fn analyze_source(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let parsed = self.frontend.parse(content).map_err(|e| match e {
            FrontendError::Syntax { .. } => AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other @ FrontendError::Language { .. } => AnalyzerError::Frontend(other),
        })?;

        let ctx = FileContext::new(path, content, self.base_dir());
        let unit = SourceUnit::new(&parsed.tree, &parsed.tokens);
        let mut violations = Vec::new();

        for checker in &self.checkers {
            if !checker
                .codes()
                .iter()
                .any(|code| self.config.is_rule_enabled(*code))
            {
                debug!("Skipping disabled checker: {}", checker.identity());
                continue;
            }

            let findings = checker.check(&unit).map_err(|source| AnalyzerError::Check {
                path: path.to_path_buf(),
                source,
            })?;

            violations.extend(
                findings
                    .iter()
                    .filter(|f| self.should_report(&ctx, f))
                    .map(|f| self.to_violation(&ctx, f)),
            );
        }

        Ok(violations)
    }

    fn should_report(&self, ctx: &FileContext<'_>, finding: &Finding) -> bool {
        if !self.config.is_rule_enabled(finding.code) {
            return false;
        }
        if self.config.analyzer.honor_noqa
            && ctx
                .line(finding.position.line)
                .is_some_and(|line| noqa::is_suppressed(line, finding.code.code()))
        {
            debug!(
                "Suppressed {} at {}:{} by noqa",
                finding.code,
                ctx.relative_path.display(),
                finding.position
            );
            return false;
        }
        true
    }

    fn to_violation(&self, ctx: &FileContext<'_>, finding: &Finding) -> Violation {
        let severity = self
            .config
            .rule_severity(finding.code)
            .unwrap_or_else(|| finding.code.default_severity());
        let mut violation = Violation::from_finding(finding, ctx.relative_path.clone(), severity);
        let offset = ctx.offset_for(violation.location.line, violation.location.column);
        violation.location = violation.location.with_span(offset, 1);
        violation
    }

    /// Discovers all source files the frontend handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let extensions = self.frontend.extensions();
        let respect_gitignore = self.config.analyzer.respect_gitignore;

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .git_global(respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.contains(&ext));
            if !handled {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.excludes.iter().any(|p| p.matches(&path_str)) {
            return true;
        }

        // Also check as substring for patterns like "**/migrations/**"
        self.exclude_patterns.iter().any(|pattern| {
            let normalized = pattern.replace("**", "");
            normalized.len() > 2 && path_str.contains(&normalized)
        })
    }
}
