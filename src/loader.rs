//! Builds [`Device`] catalog nodes out of detected drives.

use std::path::PathBuf;

use crate::{
    catalog::{ContentItem, Device, Placeholder, Profile, Thumbnail, Title},
    common::SharedCategoryKind,
    content::{ContentDevice, ContentDeviceOpener, Listing, PackageDescriptor},
    drive::{DriveDetector, DriveHandle},
    XContentError,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The drive could not be opened as a content device. It is left out of the scan.
    #[error("{drive:?} could not be opened as a content device")]
    UnreadableDevice {
        drive: PathBuf,
        #[source]
        cause: XContentError,
    },

    /// One entry (or one whole listing) could not be read. It is left out, its siblings are kept.
    #[error("skipped corrupt {what}")]
    CorruptEntry {
        what: String,
        #[source]
        cause: XContentError,
    },
}

/// A loaded device along with everything that had to be skipped while loading it.
#[derive(Debug)]
pub struct LoadReport {
    pub device: Device,
    pub skipped: Vec<LoadError>,
}

#[derive(Default)]
struct Skipped(Vec<LoadError>);

impl Skipped {
    fn record(&mut self, what: String, cause: XContentError) {
        log::warn!("skipping corrupt {what}: {cause}");
        self.0.push(LoadError::CorruptEntry { what, cause });
    }

    /// Unwraps a listing, recording the listing itself or single entries as skipped.
    fn entries<T>(&mut self, listing: Listing<T>, what: &str) -> Vec<T> {
        let entries = match listing {
            Ok(entries) => entries,
            Err(cause) => {
                self.record(format!("{what} listing"), cause);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match entry {
                Ok(entry) => Some(entry),
                Err(cause) => {
                    self.record(format!("{what} #{idx}"), cause);
                    None
                }
            })
            .collect()
    }

    fn item(&mut self, package: PackageDescriptor, what: &str) -> Option<ContentItem> {
        let raw_name = package.raw_name.clone();
        let item = ContentItem::new(package);
        if item.is_none() {
            self.record(
                format!("{what} {raw_name:?}"),
                anyhow::anyhow!("package has no path on the device").into(),
            );
        }
        item
    }
}

/// Reads the content of drives through a [`ContentDeviceOpener`].
#[derive(Debug, Clone)]
pub struct ContentDeviceLoader<O> {
    opener: O,
}

impl<O: ContentDeviceOpener> ContentDeviceLoader<O> {
    pub fn new(opener: O) -> Self {
        Self { opener }
    }

    pub fn load(&self, drive: DriveHandle) -> Result<Device, LoadError> {
        self.load_with_report(drive).map(|report| report.device)
    }

    /// Like [`Self::load`], but also hands back the entries that were skipped.
    pub fn load_with_report(&self, drive: DriveHandle) -> Result<LoadReport, LoadError> {
        let source = drive.source().to_path_buf();
        let default_name = drive.default_name();
        let volume_id = drive.volume().header().volume_id;

        // the drive moves into the opener, on error it has been dropped (and closed) by now
        let content = match self.opener.open(drive) {
            Ok(content) => content,
            Err(cause) => {
                return Err(LoadError::UnreadableDevice {
                    drive: source,
                    cause,
                })
            }
        };

        Ok(build_device(&content, default_name, source, volume_id))
    }

    /// Loads every drive the detector finds, leaving out the unreadable ones.
    pub fn scan(&self, detector: &impl DriveDetector) -> Vec<Device> {
        let devices: Vec<_> = detector
            .enumerate()
            .into_iter()
            .filter_map(|drive| match self.load(drive) {
                Ok(device) => Some(device),
                Err(e) => {
                    log::warn!("{:#}", anyhow::Error::from(e));
                    None
                }
            })
            .collect();

        log::info!("scan found {} content device(s)", devices.len());
        devices
    }
}

/// Scans all drives found by `detector` and loads them through `opener`.
/// Drives that cannot be opened are skipped, so the result may be empty.
pub fn scan_all_devices(detector: &impl DriveDetector, opener: impl ContentDeviceOpener) -> Vec<Device> {
    ContentDeviceLoader::new(opener).scan(detector)
}

/// Builds the catalog node of an already opened content device.
///
/// `default_name` is used when the device reports no name of its own.
pub fn build_device(
    content: &impl ContentDevice,
    default_name: impl Into<String>,
    source: impl Into<PathBuf>,
    volume_id: u32,
) -> LoadReport {
    let source = source.into();
    let name = match content.name() {
        name if name.is_empty() => default_name.into(),
        name => name,
    };

    log::debug!("loading content of {name:?} from {source:?}");
    let mut device = Device::new(name, content.kind(), source, volume_id);
    let mut skipped = Skipped::default();

    load_profiles(content, &mut device, &mut skipped);
    load_shared(content, &mut device, &mut skipped);

    LoadReport {
        device,
        skipped: skipped.0,
    }
}

fn load_profiles(content: &impl ContentDevice, device: &mut Device, skipped: &mut Skipped) {
    for package in skipped.entries(content.profiles(), "profile") {
        let mut profile = Profile::new(package);

        for entry in skipped.entries(content.titles(&profile.package), "title") {
            let what = format!("save of {}", entry.title_id);
            let saves = skipped.entries(content.saves(&profile.package, &entry), &what);

            profile.titles.push(Title {
                title_id: entry.title_id,
                name: entry.name,
                thumbnail: Thumbnail::or_placeholder(Some(entry.thumbnail), Placeholder::Folder),
                saves: saves
                    .into_iter()
                    .filter_map(|pkg| skipped.item(pkg, "save"))
                    .collect(),
            });
        }

        device.profiles.push(profile);
    }
}

fn load_shared(content: &impl ContentDevice, device: &mut Device, skipped: &mut Skipped) {
    for kind in SharedCategoryKind::ALL {
        let what = format!("{kind} item");
        let items: Vec<_> = skipped
            .entries(content.shared_items(kind), &what)
            .into_iter()
            .filter_map(|pkg| skipped.item(pkg, &what))
            .collect();

        device.shared_category_mut(kind).items = items;
    }
}
