use std::io;
use crate::{
    container::ContainerError,
    headers::HeaderError,
    object::ObjectError,
    stream::config::ConfigError,
};

/// Unified error for reading and writing BLF files.
/// - `From<T>` impls enable `?` across the codec layers.
/// - Only stream corruption and I/O failures ever reach a caller; skippable
///   conditions are handled where they occur.
#[derive(Debug)]
pub enum LogError {
    Io(io::Error),

    /// File header missing or malformed.
    Header(HeaderError),

    /// Object stream corrupt.
    Object(ObjectError),

    /// Container could not be built (writer side).
    Container(ContainerError),

    /// Invalid writer configuration.
    Config(ConfigError),

    /// Operation on a writer that has already been closed.
    WriterClosed,
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::Io(e) => write!(f, "I/O error: {}", e),
            LogError::Header(e) => write!(f, "header error: {}", e),
            LogError::Object(e) => write!(f, "object error: {}", e),
            LogError::Container(e) => write!(f, "container error: {}", e),
            LogError::Config(e) => write!(f, "config error: {}", e),
            LogError::WriterClosed => write!(f, "writer already closed"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Io(e) => Some(e),
            LogError::Header(e) => Some(e),
            LogError::Object(e) => Some(e),
            LogError::Container(e) => Some(e),
            LogError::Config(e) => Some(e),
            LogError::WriterClosed => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(e: io::Error) -> Self {
        LogError::Io(e)
    }
}

impl From<HeaderError> for LogError {
    fn from(e: HeaderError) -> Self {
        LogError::Header(e)
    }
}

impl From<ObjectError> for LogError {
    fn from(e: ObjectError) -> Self {
        LogError::Object(e)
    }
}

impl From<ContainerError> for LogError {
    fn from(e: ContainerError) -> Self {
        LogError::Container(e)
    }
}

impl From<ConfigError> for LogError {
    fn from(e: ConfigError) -> Self {
        LogError::Config(e)
    }
}
