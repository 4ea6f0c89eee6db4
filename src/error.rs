use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum XContentError {
    #[error("binrw error")]
    BinRwError(#[from] binrw::Error),

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("substorage error")]
    SubStorage(#[from] crate::storage::SubStorageError),

    #[error("{path:?} does not hold a FATX volume")]
    NotFatx { path: PathBuf },

    #[error("no package at {path:?} on this device")]
    NoSuchPackage { path: String },

    #[error("config error")]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<XContentError> for std::io::Error {
    fn from(value: XContentError) -> Self {
        crate::utils::other_io_error(value)
    }
}

pub type XContentResult<T> = core::result::Result<T, XContentError>;
