use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    ApplicationUnavailable(String),
    DocumentOpenFailed { path: PathBuf, reason: String },
    ExportFailed { path: PathBuf, reason: String },
    ResourceCleanupFailed(String),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::DocumentOpenFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn export_failed(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::ExportFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ApplicationUnavailable(reason) => {
                write!(f, "office application unavailable: {reason}")
            }
            Error::DocumentOpenFailed { path, reason } => {
                write!(f, "could not open {}: {reason}", path.display())
            }
            Error::ExportFailed { path, reason } => {
                write!(f, "could not export to {}: {reason}", path.display())
            }
            Error::ResourceCleanupFailed(reason) => write!(f, "cleanup failed: {reason}"),
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Xml(e) => write!(f, "XML error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Zip(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
