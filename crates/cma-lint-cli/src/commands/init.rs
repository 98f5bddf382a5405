//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# cma-lint configuration

[checks]
# Constructors whose message argument is checked (matched on the last name,
# so `rest_framework.exceptions.ValidationError` counts too)
constructors = ["ValidationError"]

# Calls that mark a message for translation
markers = ["_"]

# Every message must end with this character
terminal_punctuation = "."

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/.venv/**",
    "**/migrations/**",
]

# Respect .gitignore files
respect_gitignore = true

# Let `# noqa` comments suppress findings
honor_noqa = true

# Rule configurations, keyed by name or code
# Each rule can be enabled/disabled and have its severity overridden

[rules.missing-trailing-comma]
enabled = true
# severity = "warning"  # Override default severity

[rules.message-missing-punctuation]
enabled = true

[rules.message-not-wrapped]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = write_config(Path::new("."), force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", config_path.display());
    println!("  2. Run: cma-lint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
