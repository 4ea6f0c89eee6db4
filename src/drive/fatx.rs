use binrw::BinRead;

use crate::{
    storage::{FromStorage, Storage},
    XContentResult,
};

/// Offset of the data partition on a retail hard drive.
pub const HARD_DRIVE_DATA_OFFSET: u64 = 0x1_30EB_0000;

/// Offset of the content partition inside the concatenated `DataXXXX` files
/// of a removable drive.
pub const REMOVABLE_CONTENT_OFFSET: u64 = 0x2000_0000;

/// The header at the very start of every FATX partition.
#[binrw::binrw]
#[brw(big, magic = b"XTAF")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatxVolumeHeader {
    pub volume_id: u32,
    pub sectors_per_cluster: u32,
    pub root_dir_first_cluster: u32,
}

impl FatxVolumeHeader {
    pub const SIZE: u64 = 0x10;

    pub fn is_sane(&self) -> bool {
        let spc = self.sectors_per_cluster;
        spc != 0 && spc <= 0x80 && spc.is_power_of_two()
    }

    pub fn cluster_size(&self) -> u64 {
        self.sectors_per_cluster as u64 * 0x200
    }
}

/// A FATX partition: its header plus a storage spanning the partition.
#[derive(Debug, Clone)]
pub struct FatxVolume {
    header: FatxVolumeHeader,
    data: Storage,
}

impl FatxVolume {
    pub fn header(&self) -> &FatxVolumeHeader {
        &self.header
    }

    pub fn data(&self) -> &Storage {
        &self.data
    }
}

impl FromStorage for FatxVolume {
    /// Offset of the partition within the parent.
    type Args = u64;

    fn from_storage(parent: Storage, offset: Self::Args) -> XContentResult<Self> {
        let parent_len = parent.length()?;
        let data = parent.split(offset, parent_len.saturating_sub(offset))?;

        let header = FatxVolumeHeader::read(&mut data.clone().into_stdio())?;
        if !header.is_sane() {
            return Err(anyhow::anyhow!(
                "implausible sectors per cluster value {:#x}",
                header.sectors_per_cluster
            )
            .into());
        }

        Ok(Self { header, data })
    }
}

#[cfg(test)]
pub(crate) fn raw_header(volume_id: u32, sectors_per_cluster: u32) -> Vec<u8> {
    use binrw::BinWrite;

    let mut out = binrw::io::Cursor::new(Vec::new());
    FatxVolumeHeader {
        volume_id,
        sectors_per_cluster,
        root_dir_first_cluster: 1,
    }
    .write(&mut out)
    .unwrap();
    out.into_inner()
}
