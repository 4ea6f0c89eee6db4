//! The boundary to the FATX and package parsers.
//!
//! A parser plugs in by implementing [`ContentDeviceOpener`] for the drives
//! found by a [`crate::drive::DriveDetector`]. Listings are two-level results:
//! the outer one fails if the listing as a whole could not be read, the inner
//! ones for single corrupt entries.

pub mod memory;
mod package;

pub use package::{PackageDescriptor, PackageHandle, PackageReader};

use crate::{
    common::{DeviceKind, SharedCategoryKind, TitleId},
    drive::DriveHandle,
    XContentResult,
};

pub type Listing<T> = XContentResult<Vec<XContentResult<T>>>;

/// A game a profile has content for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub title_id: TitleId,
    pub name: String,
    pub thumbnail: Vec<u8>,
}

/// An opened content device.
pub trait ContentDevice {
    /// The name the device was given, empty if it has none.
    fn name(&self) -> String;

    fn kind(&self) -> DeviceKind;

    fn profiles(&self) -> Listing<PackageDescriptor>;

    fn titles(&self, profile: &PackageDescriptor) -> Listing<TitleEntry>;

    fn saves(&self, profile: &PackageDescriptor, title: &TitleEntry) -> Listing<PackageDescriptor>;

    fn shared_items(&self, category: SharedCategoryKind) -> Listing<PackageDescriptor>;
}

/// Turns a detected drive into a [`ContentDevice`].
///
/// The opener takes ownership of the drive. If opening fails the drive is
/// dropped and thereby closed; on success the device keeps it open for as
/// long as it (or a [`PackageHandle`] into it) lives.
pub trait ContentDeviceOpener {
    type Device: ContentDevice;

    fn open(&self, drive: DriveHandle) -> XContentResult<Self::Device>;
}

impl<F, D> ContentDeviceOpener for F
where
    F: Fn(DriveHandle) -> XContentResult<D>,
    D: ContentDevice,
{
    type Device = D;

    fn open(&self, drive: DriveHandle) -> XContentResult<D> {
        self(drive)
    }
}
