//! A [`ContentDevice`] over content that is already parsed and held in memory.
//!
//! Front-ends that parse packages themselves hand the results over through
//! this, and it doubles as the fixture for exercising the catalog without a
//! real drive.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;

use super::{ContentDevice, Listing, PackageDescriptor, PackageHandle, PackageReader, TitleEntry};
use crate::{
    common::{ContentType, DeviceKind, ProfileId, SharedCategoryKind, TitleId},
    drive::DriveHandle,
    storage::{Storage, VecStorage},
    XContentError, XContentResult,
};

/// Title id under which profile packages are stored (the dashboard).
const DASHBOARD_TITLE: TitleId = TitleId(0xFFFE07D1);

/// The files of a [`MemoryContentDevice`], keyed by path on device.
///
/// Every package handle holds on to these, and through them to the drive the
/// device was opened from.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: Arc<RwLock<BTreeMap<String, Storage>>>,
    drive: Option<Arc<DriveHandle>>,
}

impl MemoryFiles {
    pub fn insert(&self, path: impl Into<String>, data: Storage) -> Option<Storage> {
        self.files.write().insert(path.into(), data)
    }

    pub fn remove(&self, path: &str) -> Option<Storage> {
        self.files.write().remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl PackageReader for MemoryFiles {
    fn open(&self, path_on_device: &str) -> XContentResult<Storage> {
        self.files
            .read()
            .get(path_on_device)
            .cloned()
            .ok_or_else(|| XContentError::NoSuchPackage {
                path: path_on_device.into(),
            })
    }
}

/// A package to be added to a [`MemoryContentDevice`].
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub display_name: String,
    pub raw_name: String,
    pub content_type: ContentType,
    pub thumbnail: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NewPackage {
    pub fn new(
        display_name: impl Into<String>,
        raw_name: impl Into<String>,
        content_type: ContentType,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            raw_name: raw_name.into(),
            content_type,
            thumbnail: None,
            payload: payload.into(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<Vec<u8>>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// Index of a profile within a [`MemoryContentDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRef(usize);

/// Index of a title within a profile of a [`MemoryContentDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleRef {
    profile: ProfileRef,
    index: usize,
}

type Slot<T> = Result<T, String>;

#[derive(Debug)]
struct MemoryTitle {
    entry: TitleEntry,
    saves: Vec<Slot<PackageDescriptor>>,
    listing_broken: bool,
}

#[derive(Debug)]
struct MemoryProfile {
    id: ProfileId,
    package: PackageDescriptor,
    titles: Vec<Slot<MemoryTitle>>,
    listing_broken: bool,
}

#[derive(Debug)]
pub struct MemoryContentDevice {
    name: String,
    kind: DeviceKind,
    files: MemoryFiles,
    profiles: Vec<Slot<MemoryProfile>>,
    shared: BTreeMap<SharedCategoryKind, Vec<Slot<PackageDescriptor>>>,
}

impl MemoryContentDevice {
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            files: MemoryFiles::default(),
            profiles: Vec::new(),
            shared: BTreeMap::new(),
        }
    }

    /// A device backed by a detected drive, which stays open as long as the device lives.
    pub fn on_drive(name: impl Into<String>, drive: DriveHandle) -> Self {
        let mut dev = Self::new(name, drive.kind());
        dev.files.drive = Some(Arc::new(drive));
        dev
    }

    pub fn drive(&self) -> Option<&DriveHandle> {
        self.files.drive.as_deref()
    }

    pub fn files(&self) -> &MemoryFiles {
        &self.files
    }

    fn store(&self, path: String, pkg: NewPackage) -> PackageDescriptor {
        self.files.insert(path.clone(), VecStorage::new(pkg.payload));

        PackageDescriptor {
            display_name: pkg.display_name,
            raw_name: pkg.raw_name,
            path_on_device: path,
            thumbnail: pkg.thumbnail,
            content_type: pkg.content_type,
            handle: PackageHandle::new(self.files.clone()),
        }
    }

    fn profile_mut(&mut self, profile: ProfileRef) -> XContentResult<&mut MemoryProfile> {
        match self.profiles.get_mut(profile.0) {
            Some(Ok(p)) => Ok(p),
            _ => Err(anyhow::anyhow!("no usable profile at index {}", profile.0).into()),
        }
    }

    fn title_mut(&mut self, title: TitleRef) -> XContentResult<&mut MemoryTitle> {
        match self.profile_mut(title.profile)?.titles.get_mut(title.index) {
            Some(Ok(t)) => Ok(t),
            _ => Err(anyhow::anyhow!("no usable title at index {}", title.index).into()),
        }
    }

    /// Adds a profile whose package is stored under `id`.
    pub fn add_profile(&mut self, id: ProfileId, pkg: NewPackage) -> ProfileRef {
        let path = format!(
            "/Content/{id}/{DASHBOARD_TITLE}/{:08X}/{}",
            u32::from(ContentType::Profile),
            pkg.raw_name
        );
        let package = self.store(path, pkg);

        self.profiles.push(Ok(MemoryProfile {
            id,
            package,
            titles: Vec::new(),
            listing_broken: false,
        }));
        ProfileRef(self.profiles.len() - 1)
    }

    pub fn add_corrupt_profile(&mut self, reason: impl Into<String>) {
        self.profiles.push(Err(reason.into()));
    }

    pub fn add_title(
        &mut self,
        profile: ProfileRef,
        title_id: TitleId,
        name: impl Into<String>,
        thumbnail: impl Into<Vec<u8>>,
    ) -> XContentResult<TitleRef> {
        let p = self.profile_mut(profile)?;
        p.titles.push(Ok(MemoryTitle {
            entry: TitleEntry {
                title_id,
                name: name.into(),
                thumbnail: thumbnail.into(),
            },
            saves: Vec::new(),
            listing_broken: false,
        }));

        Ok(TitleRef {
            profile,
            index: p.titles.len() - 1,
        })
    }

    pub fn add_corrupt_title(&mut self, profile: ProfileRef, reason: impl Into<String>) -> XContentResult<()> {
        self.profile_mut(profile)?.titles.push(Err(reason.into()));
        Ok(())
    }

    /// Makes listing the titles of `profile` fail as a whole.
    pub fn break_title_listing(&mut self, profile: ProfileRef) -> XContentResult<()> {
        self.profile_mut(profile)?.listing_broken = true;
        Ok(())
    }

    pub fn add_save(&mut self, title: TitleRef, pkg: NewPackage) -> XContentResult<PackageDescriptor> {
        let profile_id = self.profile_mut(title.profile)?.id;
        let title_id = self.title_mut(title)?.entry.title_id;
        let path = format!(
            "/Content/{profile_id}/{title_id}/{:08X}/{}",
            u32::from(pkg.content_type),
            pkg.raw_name
        );

        let package = self.store(path, pkg);
        self.title_mut(title)?.saves.push(Ok(package.clone()));
        Ok(package)
    }

    pub fn add_corrupt_save(&mut self, title: TitleRef, reason: impl Into<String>) -> XContentResult<()> {
        self.title_mut(title)?.saves.push(Err(reason.into()));
        Ok(())
    }

    /// Makes listing the saves of `title` fail as a whole.
    pub fn break_save_listing(&mut self, title: TitleRef) -> XContentResult<()> {
        self.title_mut(title)?.listing_broken = true;
        Ok(())
    }

    /// Adds content owned by no profile. It is listed under the category its
    /// content type belongs to.
    pub fn add_shared(&mut self, title_id: TitleId, pkg: NewPackage) -> PackageDescriptor {
        let category = SharedCategoryKind::for_content_type(pkg.content_type);
        let path = format!(
            "/Content/{}/{title_id}/{:08X}/{}",
            ProfileId::SHARED,
            u32::from(pkg.content_type),
            pkg.raw_name
        );

        let package = self.store(path, pkg);
        self.shared
            .entry(category)
            .or_default()
            .push(Ok(package.clone()));
        package
    }

    pub fn add_corrupt_shared(&mut self, category: SharedCategoryKind, reason: impl Into<String>) {
        self.shared.entry(category).or_default().push(Err(reason.into()));
    }
}

fn corrupt(reason: &str) -> XContentError {
    anyhow::anyhow!("{reason}").into()
}

fn list<T: Clone>(slots: &[Slot<T>]) -> Vec<XContentResult<T>> {
    slots
        .iter()
        .map(|s| s.as_ref().map(T::clone).map_err(|r| corrupt(r)))
        .collect()
}

impl MemoryContentDevice {
    fn find_profile(&self, profile: &PackageDescriptor) -> XContentResult<&MemoryProfile> {
        self.profiles
            .iter()
            .flatten()
            .find(|p| p.package.path_on_device == profile.path_on_device)
            .ok_or_else(|| XContentError::NoSuchPackage {
                path: profile.path_on_device.clone(),
            })
    }
}

impl ContentDevice for MemoryContentDevice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn profiles(&self) -> Listing<PackageDescriptor> {
        Ok(self
            .profiles
            .iter()
            .map(|p| p.as_ref().map(|p| p.package.clone()).map_err(|r| corrupt(r)))
            .collect())
    }

    fn titles(&self, profile: &PackageDescriptor) -> Listing<TitleEntry> {
        let p = self.find_profile(profile)?;
        if p.listing_broken {
            return Err(corrupt("title directory unreadable"));
        }

        Ok(p.titles
            .iter()
            .map(|t| t.as_ref().map(|t| t.entry.clone()).map_err(|r| corrupt(r)))
            .collect())
    }

    fn saves(&self, profile: &PackageDescriptor, title: &TitleEntry) -> Listing<PackageDescriptor> {
        let t = self
            .find_profile(profile)?
            .titles
            .iter()
            .flatten()
            .find(|t| t.entry.title_id == title.title_id)
            .ok_or_else(|| anyhow::anyhow!("no title {} on this profile", title.title_id))?;

        if t.listing_broken {
            return Err(corrupt("save directory unreadable"));
        }

        Ok(list(&t.saves))
    }

    fn shared_items(&self, category: SharedCategoryKind) -> Listing<PackageDescriptor> {
        Ok(self
            .shared
            .get(&category)
            .map(|items| list(items))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_packages_like_a_console() -> XContentResult<()> {
        let mut dev = MemoryContentDevice::new("USB", DeviceKind::RemovableDrive);
        let p = dev.add_profile(
            ProfileId(0xE000_0000_0000_0001),
            NewPackage::new("Gamer", "E000000000000001", ContentType::Profile, b"profile".to_vec()),
        );
        let t = dev.add_title(p, TitleId(0x4D5307E6), "Halo 3", b"png".to_vec())?;
        let save = dev.add_save(
            t,
            NewPackage::new("Campaign", "SAVE0001", ContentType::SavedGame, b"save".to_vec()),
        )?;
        let dlc = dev.add_shared(
            TitleId(0x4D5307E6),
            NewPackage::new("Map Pack", "MAPPACK1", ContentType::MarketplaceContent, b"dlc".to_vec()),
        );

        let profiles = dev.profiles()?;
        let profile = profiles[0].as_ref().map_err(|_| corrupt("profile"))?;
        assert_eq!(
            profile.path_on_device,
            "/Content/E000000000000001/FFFE07D1/00010000/E000000000000001"
        );
        assert_eq!(
            save.path_on_device,
            "/Content/E000000000000001/4D5307E6/00000001/SAVE0001"
        );
        assert_eq!(
            dlc.path_on_device,
            "/Content/0000000000000000/4D5307E6/00000002/MAPPACK1"
        );

        assert_eq!(save.read_bytes()?, b"save");
        assert_eq!(dev.shared_items(SharedCategoryKind::Dlc)?.len(), 1);
        assert!(dev.shared_items(SharedCategoryKind::Themes)?.is_empty());
        assert_eq!(dev.files().len(), 3);

        Ok(())
    }

    #[test]
    fn missing_files_fail_to_open() -> XContentResult<()> {
        let mut dev = MemoryContentDevice::new("HDD", DeviceKind::HardDrive);
        let pkg = dev.add_shared(
            TitleId(1),
            NewPackage::new("Theme", "THEME", ContentType::Theme, vec![1, 2, 3]),
        );

        assert!(dev.files().remove(&pkg.path_on_device).is_some());
        assert!(matches!(
            pkg.read_bytes(),
            Err(XContentError::NoSuchPackage { .. })
        ));

        Ok(())
    }
}
