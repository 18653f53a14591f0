//! Command-line interface definitions for `msgsource`.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};

/// Default settings file name, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "i18n.toml";

/// Output formats supported by every subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one record per line.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Parsed CLI arguments for `msgsource`.
#[derive(Debug, Parser)]
#[command(name = "msgsource")]
#[command(about = "Resolve, inspect and edit layered message resources")]
#[command(version)]
pub struct Args {
    /// Settings file declaring the providers.
    #[arg(long, short, value_name = "path", default_value = DEFAULT_CONFIG)]
    pub config: Utf8PathBuf,
    /// Directory holding the resource files; defaults to the directory of
    /// the settings file.
    #[arg(long, short, value_name = "dir")]
    pub resources: Option<Utf8PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Log debug events to stderr.
    #[arg(long, short)]
    pub verbose: bool,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `msgsource`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a message code.
    Get {
        /// Message code to resolve.
        code: String,
        /// Locale to resolve for; defaults to the environment locale.
        #[arg(long, short)]
        locale: Option<String>,
        /// Positional arguments substituted into `{}` placeholders.
        args: Vec<String>,
    },
    /// List the locales supported by any provider.
    Locales,
    /// List the loaded resources with their messages.
    Resources,
    /// Show how every provider answers a code.
    Diagnose {
        /// Message code to diagnose.
        code: String,
        /// Restrict the report to one locale.
        #[arg(long, short)]
        locale: Option<String>,
    },
    /// Add or edit a message and write it back to its resource file.
    Put {
        /// Source name of the provider to edit.
        source: String,
        /// Locale whose resource receives the message.
        locale: String,
        /// Message code.
        code: String,
        /// Message template.
        message: String,
    },
}

impl Args {
    /// Directory the resource store is rooted at.
    #[must_use]
    pub fn resource_root(&self) -> &Utf8Path {
        self.resources.as_deref().unwrap_or_else(|| {
            self.config
                .parent()
                .filter(|parent| !parent.as_str().is_empty())
                .unwrap_or_else(|| Utf8Path::new("."))
        })
    }
}
