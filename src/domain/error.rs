use std::path::PathBuf;
use thiserror::Error;

/// Failures raised before a tree exists: the file could not be read or did not parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot load the Java grammar: {0}")]
    Language(String),

    #[error("syntax error at {line}:{column} near `{snippet}`")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("parser produced no tree")]
    Incomplete,
}

/// Failures raised while walking a tree.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The tree broke a structural assumption of the walk (e.g. a field without declarators).
    #[error("malformed {kind}: {reason}")]
    MalformedNode {
        kind: &'static str,
        reason: &'static str,
    },

    #[error("cannot write report line")]
    Sink(#[from] std::io::Error),
}
