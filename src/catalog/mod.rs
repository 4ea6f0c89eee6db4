//! The in-memory tree built over a scanned device.
//!
//! Every node owns its children by value, so the [`Device`] owns everything
//! below it. Nodes are looked at through [`CatalogNode`], and addressed
//! within a [`Catalog`] by [`NodePath`].

mod node;

pub use node::{CatalogNode, OpenAction};

use core::fmt;
use std::path::{Path, PathBuf};

use crate::{
    common::{DeviceKind, SharedCategoryKind, TitleId},
    content::PackageDescriptor,
};

static FOLDER_THUMBNAIL: Thumbnail = Thumbnail::Placeholder(Placeholder::Folder);

/// Shown instead of an empty profile name.
pub const UNKNOWN_PROFILE_NAME: &str = "Unknown Profile";

/// Built in icons used where a node has no image of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    HardDrive,
    RemovableDrive,
    Folder,
    /// A save or shared item without an image of its own.
    Package,
    UnknownProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    /// Encoded image bytes as stored in the package.
    Image(Vec<u8>),
    Placeholder(Placeholder),
}

impl Thumbnail {
    /// Uses `image` if there is a non-empty one, `fallback` otherwise.
    pub fn or_placeholder(image: Option<Vec<u8>>, fallback: Placeholder) -> Self {
        match image {
            Some(bytes) if !bytes.is_empty() => Thumbnail::Image(bytes),
            _ => Thumbnail::Placeholder(fallback),
        }
    }

    pub fn image(&self) -> Option<&[u8]> {
        match self {
            Thumbnail::Image(bytes) => Some(bytes),
            Thumbnail::Placeholder(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Device {
    pub(crate) name: String,
    pub(crate) kind: DeviceKind,
    pub(crate) source: PathBuf,
    pub(crate) volume_id: u32,
    pub(crate) thumbnail: Thumbnail,
    pub(crate) profiles: Vec<Profile>,
    pub(crate) shared: Vec<SharedCategory>,
}

impl Device {
    /// A device with no profiles and all shared categories empty.
    pub(crate) fn new(name: String, kind: DeviceKind, source: PathBuf, volume_id: u32) -> Self {
        let placeholder = match kind {
            DeviceKind::HardDrive => Placeholder::HardDrive,
            DeviceKind::RemovableDrive => Placeholder::RemovableDrive,
        };

        Self {
            name,
            kind,
            source,
            volume_id,
            thumbnail: Thumbnail::Placeholder(placeholder),
            profiles: Vec::new(),
            shared: SharedCategoryKind::ALL
                .into_iter()
                .map(SharedCategory::empty)
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Where the drive was opened from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn volume_id(&self) -> u32 {
        self.volume_id
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Always all eight categories, in [`SharedCategoryKind::ALL`] order.
    pub fn shared_categories(&self) -> &[SharedCategory] {
        &self.shared
    }

    pub fn shared_category(&self, kind: SharedCategoryKind) -> &SharedCategory {
        // shared is built from ALL, so the index always exists
        &self.shared[kind as usize]
    }

    pub(crate) fn shared_category_mut(&mut self, kind: SharedCategoryKind) -> &mut SharedCategory {
        &mut self.shared[kind as usize]
    }

    pub fn as_node(&self) -> CatalogNode<'_> {
        CatalogNode::Device(self)
    }
}

#[derive(Debug)]
pub struct Profile {
    pub(crate) name: String,
    pub(crate) package: PackageDescriptor,
    pub(crate) thumbnail: Thumbnail,
    pub(crate) titles: Vec<Title>,
}

impl Profile {
    pub(crate) fn new(package: PackageDescriptor) -> Self {
        let name = match package.display_name.as_str() {
            "" => UNKNOWN_PROFILE_NAME.to_string(),
            name => name.to_string(),
        };
        let thumbnail = Thumbnail::or_placeholder(package.thumbnail.clone(), Placeholder::UnknownProfile);

        Self {
            name,
            package,
            thumbnail,
            titles: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The profile's own package, e.g. for editing it.
    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    pub fn raw_name(&self) -> &str {
        &self.package.raw_name
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }
}

#[derive(Debug)]
pub struct Title {
    pub(crate) title_id: TitleId,
    pub(crate) name: String,
    pub(crate) thumbnail: Thumbnail,
    pub(crate) saves: Vec<SaveItem>,
}

impl Title {
    pub fn title_id(&self) -> TitleId {
        self.title_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    pub fn saves(&self) -> &[SaveItem] {
        &self.saves
    }
}

/// A package that can be copied off the device.
#[derive(Debug)]
pub struct ContentItem {
    pub(crate) package: PackageDescriptor,
    pub(crate) thumbnail: Thumbnail,
}

pub type SaveItem = ContentItem;
pub type SharedItem = ContentItem;

impl ContentItem {
    /// Fails for packages without a path, those cannot be extracted.
    pub(crate) fn new(package: PackageDescriptor) -> Option<Self> {
        if package.path_on_device.is_empty() {
            return None;
        }

        let thumbnail = Thumbnail::or_placeholder(package.thumbnail.clone(), Placeholder::Package);
        Some(Self { package, thumbnail })
    }

    pub fn name(&self) -> &str {
        &self.package.display_name
    }

    pub fn raw_name(&self) -> &str {
        &self.package.raw_name
    }

    pub fn path_on_device(&self) -> &str {
        &self.package.path_on_device
    }

    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }
}

#[derive(Debug)]
pub struct SharedCategory {
    pub(crate) kind: SharedCategoryKind,
    pub(crate) items: Vec<SharedItem>,
}

impl SharedCategory {
    fn empty(kind: SharedCategoryKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> SharedCategoryKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.label()
    }

    pub fn items(&self) -> &[SharedItem] {
        &self.items
    }
}

/// Position of a node in a [`Catalog`]: the device index followed by the
/// index within each parent's [`CatalogNode::children`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn device(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// `None` for device nodes.
    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            len => Some(Self(self.0[..len - 1].to_vec())),
        }
    }

    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str("/")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

/// A point in time snapshot of all scanned devices.
#[derive(Debug, Default)]
pub struct Catalog {
    devices: Vec<Device>,
}

impl Catalog {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn into_devices(self) -> Vec<Device> {
        self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn node(&self, path: &NodePath) -> Option<CatalogNode<'_>> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.devices.get(*first)?.as_node();

        for idx in rest {
            node = node.child(*idx)?;
        }

        Some(node)
    }

    pub fn parent(&self, path: &NodePath) -> Option<CatalogNode<'_>> {
        self.node(&path.parent()?)
    }

    /// Every node, depth first, parents before their children.
    pub fn walk(&self) -> Vec<(NodePath, CatalogNode<'_>)> {
        let mut out = Vec::new();
        let mut stack: Vec<_> = self
            .devices
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, dev)| (NodePath::device(idx), dev.as_node()))
            .collect();

        while let Some((path, node)) = stack.pop() {
            let children = node.children();
            stack.extend(
                children
                    .into_iter()
                    .enumerate()
                    .rev()
                    .map(|(idx, child)| (path.child(idx), child)),
            );
            out.push((path, node));
        }

        out
    }

    /// All nodes that can be extracted.
    pub fn leaves(&self) -> impl Iterator<Item = (NodePath, CatalogNode<'_>)> {
        self.walk().into_iter().filter(|(_, node)| node.is_leaf())
    }
}
