use core::fmt;

/// Identifies a game or application.
#[binrw::binrw]
#[brw(big)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TitleId(pub u32);

impl fmt::Debug for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TitleId({:08X})", &self.0)
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", &self.0)
    }
}

/// Identifies a user profile. Content owned by no profile lives under the zero id.
#[binrw::binrw]
#[brw(big)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProfileId(pub u64);

impl ProfileId {
    pub const SHARED: ProfileId = ProfileId(0);

    pub fn is_shared(self) -> bool {
        self == Self::SHARED
    }
}

impl fmt::Debug for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProfileId({:016X})", &self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::{io::Cursor, BinRead};

    #[test]
    fn ids_fmt() {
        assert_eq!(TitleId(0x4d5307e6).to_string(), "4D5307E6");
        assert_eq!(ProfileId(0xe00001d5a2b3c4d5).to_string(), "E00001D5A2B3C4D5");
        assert!(ProfileId::default().is_shared());
    }

    #[test]
    fn title_id_is_big_endian() -> binrw::BinResult<()> {
        let id = TitleId::read(&mut Cursor::new([0xffu8, 0xfe, 0x07, 0xd1]))?;
        assert_eq!(id, TitleId(0xfffe07d1));
        Ok(())
    }
}
