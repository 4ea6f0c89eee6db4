//! Discovery of FATX formatted drives.

mod fatx;

pub use fatx::{FatxVolume, FatxVolumeHeader, HARD_DRIVE_DATA_OFFSET, REMOVABLE_CONTENT_OFFSET};

#[cfg(test)]
pub(crate) use fatx::raw_header;

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    common::DeviceKind,
    config::{self, Config},
    storage::{ConcatStorage, FileStorage, Storage},
    XContentError, XContentResult,
};

/// An opened FATX drive.
///
/// The handle owns the open device; dropping it (or the last storage cloned
/// out of it) closes the device again.
#[derive(Debug)]
pub struct DriveHandle {
    source: PathBuf,
    kind: DeviceKind,
    storage: Storage,
    volume: FatxVolume,
}

impl DriveHandle {
    pub fn new(source: impl Into<PathBuf>, kind: DeviceKind, storage: Storage, volume: FatxVolume) -> Self {
        Self {
            source: source.into(),
            kind,
            storage,
            volume,
        }
    }

    /// Wraps a storage that is known to start with a FATX partition.
    pub fn from_storage(source: impl Into<PathBuf>, kind: DeviceKind, storage: Storage) -> XContentResult<Self> {
        let volume = storage.clone().map_to_storage::<FatxVolume>(0)?;
        Ok(Self::new(source, kind, storage, volume))
    }

    /// The device node, image file or `Xbox360` folder this drive was opened from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Name shown for the drive if the content on it does not carry one.
    pub fn default_name(&self) -> String {
        self.kind.to_string()
    }

    /// The whole drive.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The partition holding the content.
    pub fn volume(&self) -> &FatxVolume {
        &self.volume
    }
}

/// Finds the FATX drives attached to this machine.
pub trait DriveDetector {
    /// Every drive that could be opened and identified. Drives that fail to
    /// open are left out, so no drives at all is just an empty list.
    fn enumerate(&self) -> Vec<DriveHandle>;
}

/// Probes raw devices/images for a hard drive layout and `Xbox360` folders for
/// the split files of a removable drive.
#[derive(Debug, Clone, Default)]
pub struct FatxDriveDetector {
    hard_drives: Vec<PathBuf>,
    removable_drives: Vec<PathBuf>,
}

impl FatxDriveDetector {
    pub fn new(
        hard_drives: impl IntoIterator<Item = PathBuf>,
        removable_drives: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            hard_drives: hard_drives.into_iter().collect(),
            removable_drives: removable_drives.into_iter().collect(),
        }
    }

    /// Expands the glob patterns of the config into candidate paths.
    pub fn from_config(cfg: &Config) -> XContentResult<Self> {
        Ok(Self::new(
            expand_patterns(&cfg.hard_drive_paths)?,
            expand_patterns(&cfg.removable_paths)?,
        ))
    }

    pub fn probe_hard_drive(path: &Path) -> XContentResult<DriveHandle> {
        let storage = FileStorage::open(path)?;
        let volume = storage
            .clone()
            .map_to_storage::<FatxVolume>(HARD_DRIVE_DATA_OFFSET)
            .map_err(|e| not_fatx(path, e))?;

        Ok(DriveHandle::new(path, DeviceKind::HardDrive, storage, volume))
    }

    pub fn probe_removable(dir: &Path) -> XContentResult<DriveHandle> {
        let parts = data_files(dir)
            .iter()
            .map(FileStorage::open)
            .collect::<Result<Vec<_>, _>>()?;

        if parts.is_empty() {
            return Err(XContentError::NotFatx { path: dir.into() });
        }

        let storage = ConcatStorage::new(parts)?;
        let volume = storage
            .clone()
            .map_to_storage::<FatxVolume>(REMOVABLE_CONTENT_OFFSET)
            .map_err(|e| not_fatx(dir, e))?;

        Ok(DriveHandle::new(dir, DeviceKind::RemovableDrive, storage, volume))
    }
}

impl DriveDetector for FatxDriveDetector {
    fn enumerate(&self) -> Vec<DriveHandle> {
        let hard_drives = self
            .hard_drives
            .iter()
            .map(|path| (path, Self::probe_hard_drive(path)));
        let removable = self
            .removable_drives
            .iter()
            .map(|path| (path, Self::probe_removable(path)));

        hard_drives
            .chain(removable)
            .filter_map(|(path, res)| match res {
                Ok(drive) => {
                    log::debug!(
                        "found {} at {path:?}, volume id {:08x}",
                        drive.kind(),
                        drive.volume().header().volume_id
                    );
                    Some(drive)
                }
                Err(e) => {
                    log::debug!("skipping {path:?}: {e}");
                    None
                }
            })
            .collect()
    }
}

fn not_fatx(path: &Path, e: XContentError) -> XContentError {
    log::trace!("{path:?}: {e:?}");
    XContentError::NotFatx { path: path.into() }
}

/// `Data0000`, `Data0001`, ... in order, stopping at the first gap.
fn data_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for idx in 0..10_000 {
        let path = dir.join(format!("Data{idx:04}"));
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            _ => break,
        }
    }

    files
}

fn expand_patterns(patterns: &[String]) -> XContentResult<Vec<PathBuf>> {
    let mut out = BTreeSet::new();

    for pattern in patterns {
        let pattern = config::expand(pattern)?;

        // device namespaces like \\.\PhysicalDrive0 cant be listed, take them verbatim
        if !pattern.contains(['*', '?', '[']) || pattern.starts_with(r"\\.\") {
            out.insert(PathBuf::from(pattern));
            continue;
        }

        match glob::glob(&pattern) {
            Ok(paths) => out.extend(paths.filter_map(Result::ok)),
            Err(e) => log::warn!("ignoring invalid pattern {pattern:?}: {e}"),
        }
    }

    Ok(out.into_iter().collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{
        fs::File,
        io::{Seek, SeekFrom, Write},
    };

    pub(crate) fn hard_drive_image(dir: &Path, volume_id: u32) -> std::io::Result<PathBuf> {
        let path = dir.join(format!("hdd-{volume_id:08x}.img"));
        let mut fp = File::create(&path)?;

        // sparse, only the header is actually written
        fp.set_len(HARD_DRIVE_DATA_OFFSET + 0x10000)?;
        fp.seek(SeekFrom::Start(HARD_DRIVE_DATA_OFFSET))?;
        fp.write_all(&fatx::raw_header(volume_id, 0x20))?;

        Ok(path)
    }

    pub(crate) fn removable_drive(dir: &Path, volume_id: u32) -> std::io::Result<PathBuf> {
        let root = dir.join("Xbox360");
        fs::create_dir_all(&root)?;

        File::create(root.join("Data0000"))?.set_len(REMOVABLE_CONTENT_OFFSET)?;
        let mut fp = File::create(root.join("Data0001"))?;
        fp.write_all(&fatx::raw_header(volume_id, 0x20))?;
        fp.write_all(&[0; 0x1000])?;

        Ok(root)
    }

    #[test]
    fn finds_both_kinds_of_drives() -> XContentResult<()> {
        let dir = tempfile::tempdir()?;
        let hdd = hard_drive_image(dir.path(), 0x1111)?;
        let usb = removable_drive(dir.path(), 0x2222)?;

        let junk = dir.path().join("junk.img");
        fs::write(&junk, vec![0u8; 0x1000])?;

        let detector = FatxDriveDetector::new(
            [hdd.clone(), junk.clone(), dir.path().join("missing.img")],
            [usb.clone(), dir.path().to_path_buf()],
        );
        let drives = detector.enumerate();

        assert_eq!(drives.len(), 2);
        assert_eq!(drives[0].kind(), DeviceKind::HardDrive);
        assert_eq!(drives[0].source(), hdd);
        assert_eq!(drives[0].volume().header().volume_id, 0x1111);
        assert_eq!(drives[1].kind(), DeviceKind::RemovableDrive);
        assert_eq!(drives[1].source(), usb);
        assert_eq!(drives[1].volume().header().volume_id, 0x2222);
        assert_eq!(drives[1].volume().data().length()?, 0x1010);

        Ok(())
    }

    #[test]
    fn nothing_attached_is_empty_not_an_error() {
        assert!(FatxDriveDetector::default().enumerate().is_empty());
    }

    #[test]
    fn config_patterns_are_expanded() -> XContentResult<()> {
        let dir = tempfile::tempdir()?;
        let a = hard_drive_image(dir.path(), 1)?;
        let b = hard_drive_image(dir.path(), 2)?;

        let cfg = Config {
            hard_drive_paths: vec![
                format!("{}/hdd-*.img", dir.path().display()),
                a.display().to_string(),
            ],
            removable_paths: vec![format!("{}/*/Xbox360", dir.path().display())],
            export_dir: String::new(),
        };

        let detector = FatxDriveDetector::from_config(&cfg)?;
        assert_eq!(detector.hard_drives, [a, b]);
        assert!(detector.removable_drives.is_empty());

        Ok(())
    }
}
