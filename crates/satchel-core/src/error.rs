use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SatchelError>;

#[derive(Debug, Error)]
pub enum SatchelError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("'{}' does not look like a leftover backup artifact; refusing to clear the staging directory", .0.display())]
    UnsafeDirectory(PathBuf),

    #[error("archive creation failed: {0}")]
    ArchiveCreation(String),

    #[error("no disk-usage support on platform '{0}'")]
    UnsupportedPlatform(&'static str),

    #[error("corrupt retention state: {0}")]
    CorruptRetentionState(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
