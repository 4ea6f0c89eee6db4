mod content_type;
mod ids;

pub use content_type::ContentType;
pub use ids::{ProfileId, TitleId};

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    HardDrive,
    RemovableDrive,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceKind::HardDrive => "Hard Drive",
            DeviceKind::RemovableDrive => "Removable Drive",
        })
    }
}

/// The fixed groupings of content that belongs to the device rather than to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SharedCategoryKind {
    Games,
    Dlc,
    Demos,
    Videos,
    Themes,
    GamerPictures,
    AvatarItems,
    SystemItems,
}

impl SharedCategoryKind {
    /// All categories, in the order they appear under a device.
    pub const ALL: [SharedCategoryKind; 8] = [
        Self::Games,
        Self::Dlc,
        Self::Demos,
        Self::Videos,
        Self::Themes,
        Self::GamerPictures,
        Self::AvatarItems,
        Self::SystemItems,
    ];

    pub fn label(self) -> &'static str {
        use SharedCategoryKind::*;
        match self {
            Games => "Games",
            Dlc => "DLC",
            Demos => "Demos",
            Videos => "Videos",
            Themes => "Themes",
            GamerPictures => "Gamer Pictures",
            AvatarItems => "Avatar Items",
            SystemItems => "System Items",
        }
    }

    /// Which category a shared package of the given type is listed under.
    pub fn for_content_type(ty: ContentType) -> Self {
        use ContentType::*;
        match ty {
            Xbox360Title | InstalledGame | GameOnDemand | XboxOriginalGame | ArcadeGame
            | CommunityGame | GamerTitle => Self::Games,
            MarketplaceContent => Self::Dlc,
            GameDemo => Self::Demos,
            GameTrailer | GameVideo | Movie | MusicVideo | PodcastVideo | ViralVideo
            | Tv => Self::Videos,
            Theme => Self::Themes,
            GamerPicture => Self::GamerPictures,
            AvatarItem | AvatarAssetPack => Self::AvatarItems,
            _ => Self::SystemItems,
        }
    }
}

impl fmt::Display for SharedCategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
