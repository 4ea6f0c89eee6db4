#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Catalogs the content of FATX formatted drives (profiles, their titles and
//! saves, and the shared content categories) and copies single packages out
//! of them onto the local filesystem.
//!
//! The pipeline is [`drive::DriveDetector`] → [`loader::ContentDeviceLoader`]
//! → [`catalog::Catalog`] → [`extract::Extractor`]. Parsing of the FATX
//! directory tree and of the packages themselves happens behind the
//! [`content::ContentDeviceOpener`] seam.

pub mod catalog;
pub mod common;
pub mod config;
pub mod content;
pub mod drive;
pub mod error;
pub mod extract;
pub mod loader;
pub mod storage;
pub mod utils;

pub use error::{XContentError, XContentResult};
pub use loader::scan_all_devices;

pub mod prelude {
    pub use super::{
        catalog::{Catalog, CatalogNode, Device, NodePath, Thumbnail},
        common::{ContentType, DeviceKind, SharedCategoryKind},
        content::{ContentDevice, ContentDeviceOpener, PackageDescriptor, PackageHandle},
        drive::{DriveDetector, DriveHandle, FatxDriveDetector},
        extract::{DestinationResolver, ExtractError, Extractor, IntoDirectory, SaveAs},
        loader::{build_device, scan_all_devices, ContentDeviceLoader, LoadError},
        storage::{IStorage, Storage, VecStorage},
        XContentError, XContentResult,
    };
}
