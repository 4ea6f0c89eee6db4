use core::fmt;

/// The content type tag stored in a package header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    SavedGame,
    MarketplaceContent,
    Publisher,
    Xbox360Title,
    IptvPauseBuffer,
    InstalledGame,
    XboxOriginalGame,
    GameOnDemand,
    AvatarAssetPack,
    AvatarItem,
    Profile,
    GamerPicture,
    Theme,
    CacheFile,
    StorageDownload,
    XboxSavedGame,
    XboxDownload,
    GameDemo,
    GamerTitle,
    Installer,
    GameTrailer,
    ArcadeGame,
    Xna,
    LicenseStore,
    Movie,
    Tv,
    MusicVideo,
    GameVideo,
    PodcastVideo,
    ViralVideo,
    CommunityGame,
    Unknown(u32),
}

const TABLE: &[(u32, ContentType)] = {
    use ContentType::*;
    &[
        (0x0000_0001, SavedGame),
        (0x0000_0002, MarketplaceContent),
        (0x0000_0003, Publisher),
        (0x0000_1000, Xbox360Title),
        (0x0000_2000, IptvPauseBuffer),
        (0x0000_4000, InstalledGame),
        (0x0000_5000, XboxOriginalGame),
        (0x0000_7000, GameOnDemand),
        (0x0000_8000, AvatarAssetPack),
        (0x0000_9000, AvatarItem),
        (0x0001_0000, Profile),
        (0x0002_0000, GamerPicture),
        (0x0003_0000, Theme),
        (0x0004_0000, CacheFile),
        (0x0005_0000, StorageDownload),
        (0x0006_0000, XboxSavedGame),
        (0x0007_0000, XboxDownload),
        (0x0008_0000, GameDemo),
        (0x000A_0000, GamerTitle),
        (0x000B_0000, Installer),
        (0x000C_0000, GameTrailer),
        (0x000D_0000, ArcadeGame),
        (0x000E_0000, Xna),
        (0x000F_0000, LicenseStore),
        (0x0010_0000, Movie),
        (0x0020_0000, Tv),
        (0x0030_0000, MusicVideo),
        (0x0040_0000, GameVideo),
        (0x0050_0000, PodcastVideo),
        (0x0060_0000, ViralVideo),
        (0x0200_0000, CommunityGame),
    ]
};

impl From<u32> for ContentType {
    fn from(raw: u32) -> Self {
        TABLE
            .iter()
            .find(|(id, _)| *id == raw)
            .map(|(_, ty)| *ty)
            .unwrap_or(ContentType::Unknown(raw))
    }
}

impl From<ContentType> for u32 {
    fn from(ty: ContentType) -> Self {
        match ty {
            ContentType::Unknown(raw) => raw,
            known => TABLE
                .iter()
                .find(|(_, t)| *t == known)
                .map(|(id, _)| *id)
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Unknown(raw) => write!(f, "Unknown ({raw:08X})"),
            known => fmt::Debug::fmt(known, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContentType;

    #[test]
    fn raw_values() {
        assert_eq!(ContentType::from(0x10000), ContentType::Profile);
        assert_eq!(ContentType::from(1), ContentType::SavedGame);
        assert_eq!(u32::from(ContentType::GameDemo), 0x80000);
        assert_eq!(ContentType::from(0xdead), ContentType::Unknown(0xdead));
        assert_eq!(u32::from(ContentType::Unknown(0xdead)), 0xdead);
    }
}
