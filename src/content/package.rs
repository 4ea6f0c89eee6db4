use core::fmt;
use std::sync::Arc;

use crate::{common::ContentType, storage::Storage, XContentResult};

/// Gives access to the files of an opened content device.
pub trait PackageReader: fmt::Debug + Send + Sync {
    /// Opens the file at `path_on_device` as a storage.
    fn open(&self, path_on_device: &str) -> XContentResult<Storage>;
}

/// Shared handle to the [`PackageReader`] of the device a package lives on.
#[derive(Clone)]
pub struct PackageHandle(Arc<dyn PackageReader>);

impl PackageHandle {
    pub fn new(reader: impl PackageReader + 'static) -> Self {
        Self(Arc::new(reader))
    }

    pub fn from_arc(reader: Arc<dyn PackageReader>) -> Self {
        Self(reader)
    }

    pub fn open(&self, path_on_device: &str) -> XContentResult<Storage> {
        self.0.open(path_on_device)
    }

    pub fn read_bytes(&self, path_on_device: &str) -> XContentResult<Vec<u8>> {
        self.open(path_on_device)?.read_to_vec()
    }
}

impl fmt::Debug for PackageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PackageHandle").field(&self.0).finish()
    }
}

/// Metadata of one package as reported by the package parser.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    pub display_name: String,
    pub raw_name: String,
    pub path_on_device: String,
    pub thumbnail: Option<Vec<u8>>,
    pub content_type: ContentType,
    pub handle: PackageHandle,
}

impl PackageDescriptor {
    /// The package payload, exactly as stored on the device.
    pub fn open(&self) -> XContentResult<Storage> {
        self.handle.open(&self.path_on_device)
    }

    pub fn read_bytes(&self) -> XContentResult<Vec<u8>> {
        self.handle.read_bytes(&self.path_on_device)
    }

    pub fn is_profile(&self) -> bool {
        self.content_type == ContentType::Profile
    }
}
