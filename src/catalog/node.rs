use super::{ContentItem, Thumbnail, FOLDER_THUMBNAIL};
use crate::content::PackageDescriptor;

/// A borrowed view of one node of the catalog.
#[derive(Debug, Clone, Copy)]
pub enum CatalogNode<'a> {
    Device(&'a super::Device),
    Profile(&'a super::Profile),
    Title(&'a super::Title),
    SaveItem(&'a super::SaveItem),
    SharedCategory(&'a super::SharedCategory),
    SharedItem(&'a super::SharedItem),
}

/// What activating a node should bring up.
#[derive(Debug, Clone, Copy)]
pub enum OpenAction<'a> {
    ProfileEditor(&'a PackageDescriptor),
    PackageViewer(&'a PackageDescriptor),
}

impl<'a> CatalogNode<'a> {
    pub fn display_name(&self) -> &'a str {
        use CatalogNode::*;
        match *self {
            Device(d) => d.name(),
            Profile(p) => p.name(),
            Title(t) => t.name(),
            SaveItem(i) | SharedItem(i) => i.name(),
            SharedCategory(c) => c.name(),
        }
    }

    pub fn thumbnail(&self) -> &'a Thumbnail {
        use CatalogNode::*;
        match *self {
            Device(d) => d.thumbnail(),
            Profile(p) => p.thumbnail(),
            Title(t) => t.thumbnail(),
            SaveItem(i) | SharedItem(i) => i.thumbnail(),
            SharedCategory(_) => &FOLDER_THUMBNAIL,
        }
    }

    /// Children in on-device discovery order. A device lists its profiles
    /// followed by the shared categories.
    pub fn children(&self) -> Vec<CatalogNode<'a>> {
        use CatalogNode::*;
        match *self {
            Device(d) => d
                .profiles
                .iter()
                .map(Profile)
                .chain(d.shared.iter().map(SharedCategory))
                .collect(),
            Profile(p) => p.titles.iter().map(Title).collect(),
            Title(t) => t.saves.iter().map(SaveItem).collect(),
            SharedCategory(c) => c.items.iter().map(SharedItem).collect(),
            SaveItem(_) | SharedItem(_) => Vec::new(),
        }
    }

    pub fn child(&self, index: usize) -> Option<CatalogNode<'a>> {
        use CatalogNode::*;
        match *self {
            Device(d) => match d.profiles.get(index) {
                Some(p) => Some(Profile(p)),
                None => d
                    .shared
                    .get(index - d.profiles.len())
                    .map(SharedCategory),
            },
            Profile(p) => p.titles.get(index).map(Title),
            Title(t) => t.saves.get(index).map(SaveItem),
            SharedCategory(c) => c.items.get(index).map(SharedItem),
            SaveItem(_) | SharedItem(_) => None,
        }
    }

    /// Whether this node is backed by a file that can be extracted.
    pub fn is_leaf(&self) -> bool {
        matches!(self, CatalogNode::SaveItem(_) | CatalogNode::SharedItem(_))
    }

    /// The path of the backing file, only set for leaves.
    pub fn path_on_device(&self) -> Option<&'a str> {
        self.content_item()
            .map(ContentItem::path_on_device)
            .filter(|path| !path.is_empty())
    }

    /// The on-device file name, used as the default name when extracting.
    pub fn raw_name(&self) -> Option<&'a str> {
        self.package().map(|p| p.raw_name.as_str())
    }

    /// The package behind profiles and leaves.
    pub fn package(&self) -> Option<&'a PackageDescriptor> {
        match *self {
            CatalogNode::Profile(p) => Some(p.package()),
            CatalogNode::SaveItem(i) | CatalogNode::SharedItem(i) => Some(i.package()),
            _ => None,
        }
    }

    pub fn content_item(&self) -> Option<&'a ContentItem> {
        match *self {
            CatalogNode::SaveItem(i) | CatalogNode::SharedItem(i) => Some(i),
            _ => None,
        }
    }

    /// Profiles open in a profile editor, every other package in a generic viewer.
    pub fn open_action(&self) -> Option<OpenAction<'a>> {
        self.package().map(|pkg| {
            if pkg.is_profile() {
                OpenAction::ProfileEditor(pkg)
            } else {
                OpenAction::PackageViewer(pkg)
            }
        })
    }

    /// Whether both refer to the very same node, not just equal looking ones.
    pub fn same_node(&self, other: &CatalogNode<'_>) -> bool {
        use core::ptr::eq;
        use CatalogNode::*;
        match (*self, *other) {
            (Device(a), Device(b)) => eq(a, b),
            (Profile(a), Profile(b)) => eq(a, b),
            (Title(a), Title(b)) => eq(a, b),
            (SaveItem(a), SaveItem(b)) | (SharedItem(a), SharedItem(b)) => eq(a, b),
            (SharedCategory(a), SharedCategory(b)) => eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogNode, OpenAction};
    use crate::{
        catalog::{ContentItem, Device, Placeholder, Profile, Thumbnail, Title},
        common::{ContentType, DeviceKind, SharedCategoryKind, TitleId},
        content::{memory::MemoryFiles, PackageDescriptor, PackageHandle},
    };

    fn package(content_type: ContentType, path: &str) -> PackageDescriptor {
        PackageDescriptor {
            display_name: "Pkg".into(),
            raw_name: "RAW0001".into(),
            path_on_device: path.into(),
            thumbnail: None,
            content_type,
            handle: PackageHandle::new(MemoryFiles::default()),
        }
    }

    #[test]
    fn only_items_are_leaves() {
        let mut dev = Device::new("HDD".into(), DeviceKind::HardDrive, "/img".into(), 0);
        let mut profile = Profile::new(package(ContentType::Profile, "/profile"));
        profile.titles.push(Title {
            title_id: TitleId(2),
            name: "T".into(),
            thumbnail: Thumbnail::Image(vec![0]),
            saves: ContentItem::new(package(ContentType::SavedGame, "/save")).into_iter().collect(),
        });
        dev.profiles.push(profile);

        let dev_node = dev.as_node();
        let profile = dev_node.child(0).unwrap();
        let title = profile.child(0).unwrap();
        let save = title.child(0).unwrap();
        let games = dev_node.child(1).unwrap();

        for node in [dev_node, profile, title, games] {
            assert!(!node.is_leaf());
            assert_eq!(node.path_on_device(), None);
        }
        assert!(save.is_leaf());
        assert_eq!(save.path_on_device(), Some("/save"));
        assert_eq!(save.raw_name(), Some("RAW0001"));

        assert_eq!(games.display_name(), SharedCategoryKind::Games.label());
        assert_eq!(games.thumbnail(), &Thumbnail::Placeholder(Placeholder::Folder));
        assert!(dev_node.child(9).is_none());
        assert!(save.child(0).is_none());

        assert!(matches!(profile.open_action(), Some(OpenAction::ProfileEditor(_))));
        assert!(matches!(save.open_action(), Some(OpenAction::PackageViewer(_))));
        assert!(title.open_action().is_none());
    }
}
