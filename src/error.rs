// Copyright 2016 Adam Perry. Dual-licensed MIT and Apache 2.0 (see LICENSE files for details).

use std::convert::From;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use rocket_contrib::templates::handlebars::RenderError;

pub type VocabResult<T> = std::result::Result<T, VocabError>;

#[derive(Debug)]
pub enum VocabError {
    /// A single subtitle file could not be opened or decoded.
    FileRead { path: PathBuf, source: io::Error },
    /// The exception list could not be read, created or appended to.
    ExceptionStore(io::Error),
    Io(io::Error),
    Template(RenderError),
    StorePoisoned,
    Config(String),
    Launch(String),
}

impl VocabError {
    pub fn file_read<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        VocabError::FileRead {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for VocabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabError::FileRead { path, source } => {
                write!(f, "unable to read subtitle file {}: {}", path.display(), source)
            }
            VocabError::ExceptionStore(e) => write!(f, "exception list unavailable: {}", e),
            VocabError::Io(e) => write!(f, "i/o error: {}", e),
            VocabError::Template(e) => write!(f, "template error: {}", e),
            VocabError::StorePoisoned => f.write_str("vocabulary store lock was poisoned"),
            VocabError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            VocabError::Launch(msg) => write!(f, "unable to launch server: {}", msg),
        }
    }
}

impl Error for VocabError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VocabError::FileRead { source, .. } => Some(source),
            VocabError::ExceptionStore(e) => Some(e),
            VocabError::Io(e) => Some(e),
            VocabError::Template(e) => Some(e),
            VocabError::StorePoisoned | VocabError::Config(_) | VocabError::Launch(_) => None,
        }
    }
}

impl From<io::Error> for VocabError {
    fn from(e: io::Error) -> Self {
        VocabError::Io(e)
    }
}

impl From<RenderError> for VocabError {
    fn from(e: RenderError) -> Self {
        VocabError::Template(e)
    }
}

impl<T> From<std::sync::PoisonError<T>> for VocabError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        VocabError::StorePoisoned
    }
}

impl From<rocket::config::ConfigError> for VocabError {
    fn from(e: rocket::config::ConfigError) -> Self {
        VocabError::Config(format!("{:?}", e))
    }
}
