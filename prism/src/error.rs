/*! Defines the errors raised while translating a program. All of them are fatal to the
translation of the current input. */

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A term of a shape the translation does not cover, such as a pool or an external
    /// function.
    #[error("unsupported term: {description}")]
    UnsupportedTerm { description: String },

    /// A head of a shape the translation does not cover, such as a disjunction or an
    /// aggregate.
    #[error("unsupported head: {description}")]
    UnsupportedHead { description: String },

    /// A body literal of a shape the translation does not cover, such as an aggregate
    /// or a theory atom.
    #[error("unsupported body literal: {description}")]
    UnsupportedBody { description: String },

    /// A recognized construct whose translation is reserved for future work.
    #[error("unsupported feature: {description}")]
    UnsupportedFeature { description: String },

    /// More than one input program was passed to the completion pipeline.
    #[error("only one input program may be translated at a time")]
    MultipleInputs,

    #[error("could not read \"{}\"", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse \"{name}\" at line {line}, column {column}: {message}")]
    Parse {
        name: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// An internal invariant was violated.
    #[error("internal error: {description}")]
    Internal { description: String },
}

impl Error {
    pub fn unsupported_term(description: impl Into<String>) -> Self {
        Self::UnsupportedTerm {
            description: description.into(),
        }
    }

    pub fn unsupported_head(description: impl Into<String>) -> Self {
        Self::UnsupportedHead {
            description: description.into(),
        }
    }

    pub fn unsupported_body(description: impl Into<String>) -> Self {
        Self::UnsupportedBody {
            description: description.into(),
        }
    }

    pub fn unsupported_feature(description: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            description: description.into(),
        }
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::Internal {
            description: description.into(),
        }
    }
}
