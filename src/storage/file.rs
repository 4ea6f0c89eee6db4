use super::{IStorage, Storage};
use crate::XContentResult;

use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

#[derive(Debug)]
pub struct FileStorage {
    fp: Mutex<File>,
}

impl FileStorage {
    pub fn new(fp: File) -> Storage {
        Storage::new(Self { fp: Mutex::new(fp) })
    }

    /// Opens `path` readonly. This is how drives are opened, nothing in this
    /// crate ever writes to a device.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Storage> {
        File::open(path).map(Self::new)
    }
}

impl IStorage for FileStorage {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> XContentResult<u64> {
        let mut fp = self.fp.lock();

        fp.seek(SeekFrom::Start(offset))?;

        // File::read may come back short before EOF, e.g. on block devices
        let mut cnt = 0;
        while cnt < buf.len() {
            match fp.read(&mut buf[cnt..]) {
                Ok(0) => break,
                Ok(n) => cnt += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(cnt as _)
    }

    fn length(&self) -> XContentResult<u64> {
        let mut fp = self.fp.lock();
        let meta = fp.metadata()?;
        if meta.is_file() {
            return Ok(meta.len());
        }

        // block devices report a zero length in their metadata
        let len = fp.seek(SeekFrom::End(0))?;
        Ok(len)
    }
}
