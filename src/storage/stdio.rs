use super::Storage;
use std::io::{self, Read, Seek, SeekFrom};

/// wrap a Storage to get a type providing Read/Seek implementations
#[derive(Debug)]
pub struct StorageStdioWrapper {
    s: Storage,
    offset: u64,
}

impl StorageStdioWrapper {
    pub fn new(s: Storage) -> Self {
        Self { s, offset: 0 }
    }
}

impl Read for StorageStdioWrapper {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.s
            .read_at(self.offset, buf)
            .map(|size| {
                self.offset += size;
                size as _
            })
            .map_err(crate::utils::other_io_error)
    }
}

impl Seek for StorageStdioWrapper {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_offset = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(off) => self.offset.checked_add_signed(off),
            SeekFrom::End(off) => self.s.length()?.checked_add_signed(off),
        };

        self.offset = new_offset.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of storage")
        })?;

        Ok(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::VecStorage;
    use std::io::{self, Read, Seek, SeekFrom};

    #[test]
    fn seek_and_read() -> io::Result<()> {
        let mut s = VecStorage::new(vec![0, 1, 2, 3, 4, 5]).into_stdio();

        s.seek(SeekFrom::End(-2))?;
        let mut buf = Vec::new();
        s.read_to_end(&mut buf)?;
        assert_eq!(buf, [4, 5]);

        s.seek(SeekFrom::Start(1))?;
        s.seek(SeekFrom::Current(1))?;
        let mut buf = [0; 2];
        s.read_exact(&mut buf)?;
        assert_eq!(buf, [2, 3]);

        assert!(s.seek(SeekFrom::Current(-10)).is_err());

        Ok(())
    }
}
