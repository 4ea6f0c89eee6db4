use std::{fmt, io::Write, ops::Deref, sync::Arc};

use crate::XContentResult;

mod concat;
mod file;
mod mapper;
mod memory;
mod stdio;
mod substorage;

pub use self::{
    concat::ConcatStorage,
    file::FileStorage,
    mapper::FromStorage,
    memory::VecStorage,
    stdio::StorageStdioWrapper,
    substorage::{SubStorage, SubStorageError, SubStorageResult},
};

/// Size of the chunks [`Storage::copy_to`] moves at a time.
pub const COPY_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Read-only random access to a byte source. Implementors are drives, files
/// on the local disk, in-memory buffers or windows into other storages.
pub trait IStorage: fmt::Debug + Send + Sync {
    /// Reads into `buf` starting at `offset`, returning how many bytes were read.
    /// A short read only happens at the end of the storage.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> XContentResult<u64>;

    fn length(&self) -> XContentResult<u64>;

    fn into_storage(self) -> Storage
    where
        Self: Sized + 'static,
    {
        Storage::new(self)
    }
}

/// A cheaply clonable, shared handle to some [`IStorage`].
///
/// The underlying storage (and e.g. the file descriptor of a drive) is released
/// once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Storage(Arc<dyn IStorage>);

impl Storage {
    pub fn new(s: impl IStorage + 'static) -> Self {
        Self(Arc::new(s))
    }

    pub fn split(self, offset: u64, len: u64) -> SubStorageResult<Storage> {
        SubStorage::split_from(self, offset, len)
    }

    pub fn into_stdio(self) -> StorageStdioWrapper {
        StorageStdioWrapper::new(self)
    }

    pub fn map_to_storage<T: FromStorage>(self, args: T::Args) -> XContentResult<T> {
        T::from_storage(self, args)
    }

    /// Fills `buf` completely or fails with [`std::io::ErrorKind::UnexpectedEof`].
    pub fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> XContentResult<()> {
        while !buf.is_empty() {
            let read = self.read_at(offset, buf)?;
            if read == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            offset += read;
            buf = &mut buf[read as usize..];
        }
        Ok(())
    }

    pub fn read_to_vec(&self) -> XContentResult<Vec<u8>> {
        let mut out = Vec::new();
        self.copy_to(&mut out)?;
        Ok(out)
    }

    /// Streams the whole storage into `writer`, returning the number of bytes copied.
    pub fn copy_to(&self, writer: &mut impl Write) -> XContentResult<u64> {
        let len = self.length()?;
        let mut buf = vec![0; core::cmp::min(len, COPY_CHUNK_SIZE as u64) as usize];
        let mut off = 0;

        while off < len {
            let want = core::cmp::min(len - off, buf.len() as u64) as usize;
            let read = self.read_at(off, &mut buf[..want])?;
            if read == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            writer.write_all(&buf[..read as usize])?;
            off += read;
        }

        Ok(off)
    }

    /// Whether both handles point at the very same storage.
    pub fn ptr_eq(&self, other: &Storage) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to the underlying storage.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Deref for Storage {
    type Target = dyn IStorage;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XContentError;

    #[test]
    fn copy_to_moves_everything() -> XContentResult<()> {
        let data: Vec<u8> = (0..=255).cycle().take(COPY_CHUNK_SIZE + 17).collect();
        let storage = VecStorage::new(data.clone());

        let mut out = Vec::new();
        assert_eq!(storage.copy_to(&mut out)?, data.len() as u64);
        assert_eq!(out, data);

        Ok(())
    }

    #[test]
    fn read_exact_at_reports_eof() -> XContentResult<()> {
        let storage = VecStorage::new(vec![1, 2, 3]);

        let mut buf = [0; 2];
        storage.read_exact_at(1, &mut buf)?;
        assert_eq!(buf, [2, 3]);

        let mut buf = [0; 4];
        assert!(matches!(
            storage.read_exact_at(0, &mut buf),
            Err(XContentError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));

        Ok(())
    }

    #[test]
    fn clones_share_the_storage() {
        let storage = VecStorage::new(vec![0; 4]);
        let other = storage.clone();

        assert!(storage.ptr_eq(&other));
        assert_eq!(storage.handle_count(), 2);
        drop(other);
        assert_eq!(storage.handle_count(), 1);
    }
}
