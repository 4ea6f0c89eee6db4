use super::{IStorage, Storage};
use crate::XContentResult;

/// Package payloads held in memory, e.g. ones a front-end already pulled off the device.
#[derive(Debug)]
pub struct VecStorage(Vec<u8>);

impl VecStorage {
    pub fn new(buf: impl Into<Vec<u8>>) -> Storage {
        Storage::new(Self(buf.into()))
    }
}

impl IStorage for VecStorage {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> XContentResult<u64> {
        let Some(available) = usize::try_from(offset).ok().and_then(|off| self.0.get(off..)) else {
            return Ok(0);
        };

        let read_len = core::cmp::min(available.len(), buf.len());
        buf[..read_len].copy_from_slice(&available[..read_len]);
        Ok(read_len as _)
    }

    fn length(&self) -> XContentResult<u64> {
        Ok(self.0.len() as _)
    }
}
