//! Error types for `msgsource`.

use camino::Utf8PathBuf;
use message_source::I18nError;
use thiserror::Error;

/// Errors surfaced by `msgsource` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Building, querying or editing the resolver failed.
    #[error(transparent)]
    I18n(#[from] I18nError),

    /// The resource directory could not be opened.
    #[error("cannot open resource directory {path}: {cause}")]
    ResourceRoot {
        /// Directory given on the command line.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        cause: message_source::ResourceError,
    },

    /// JSON output could not be produced.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
