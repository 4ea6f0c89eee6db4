use super::{IStorage, Storage};
use crate::XContentResult;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SubStorageError {
    #[error("attempted to create a too large substorage. parent is {parent_len} large, substorage is {len} bytes at offset {offset}")]
    OutOfBounds {
        parent_len: u64,
        offset: u64,
        len: u64,
    },

    #[error("parent storage needs to declare a length")]
    FailedToGetParentStorageLength,
}

pub type SubStorageResult<T> = core::result::Result<T, SubStorageError>;

/// A partial view into an existing [`Storage`]. Used for the data partition of
/// a drive and for package payloads, where offsets are relative to the start of the region.
///
/// ```
/// use xcontent::prelude::*;
///
/// fn main() -> XContentResult<()> {
///     let memory = VecStorage::new(vec![0, 1, 2, 3, 4, 5, 6, 7]);
///     let first_half = memory.clone().split(0, 4)?;
///     let second_half = memory.clone().split(4, 4)?;
///
///     let mut buf = [0; 4];
///     first_half.read_at(0, &mut buf)?;
///     assert_eq!(buf, [0, 1, 2, 3]);
///
///     second_half.read_at(0, &mut buf)?;
///     assert_eq!(buf, [4, 5, 6, 7]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SubStorage {
    parent: Storage,
    offset: u64,
    len: u64,
}

impl SubStorage {
    pub(crate) fn split_from(parent: Storage, offset: u64, len: u64) -> SubStorageResult<Storage> {
        let parent_len = parent
            .length()
            .map_err(|_| SubStorageError::FailedToGetParentStorageLength)?;

        if offset.checked_add(len).map_or(true, |end| end > parent_len) {
            return Err(SubStorageError::OutOfBounds {
                parent_len,
                offset,
                len,
            });
        }

        Ok(Self {
            parent,
            offset,
            len,
        }
        .into_storage())
    }
}

impl IStorage for SubStorage {
    fn read_at(&self, offset: u64, mut buf: &mut [u8]) -> XContentResult<u64> {
        use core::cmp::min;

        let available_len = self.len.saturating_sub(offset);
        let buf_len = buf.len() as u64;
        buf = &mut buf[..min(available_len, buf_len) as usize];

        if buf.is_empty() {
            return Ok(0);
        }

        self.parent.read_at(self.offset + offset, buf)
    }

    fn length(&self) -> XContentResult<u64> {
        Ok(self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::SubStorageError;
    use crate::{storage::VecStorage, XContentResult};

    #[test]
    fn reads_are_clamped_to_the_window() -> XContentResult<()> {
        let sub = VecStorage::new(vec![0, 1, 2, 3, 4, 5]).split(2, 3)?;

        let mut buf = [0xff; 5];
        assert_eq!(sub.read_at(1, &mut buf)?, 2);
        assert_eq!(buf, [3, 4, 0xff, 0xff, 0xff]);
        assert_eq!(sub.read_at(3, &mut buf)?, 0);

        Ok(())
    }

    #[test]
    fn out_of_bounds_split_is_rejected() {
        let err = VecStorage::new(vec![0; 4]).split(2, 3).unwrap_err();
        assert_eq!(
            err,
            SubStorageError::OutOfBounds {
                parent_len: 4,
                offset: 2,
                len: 3
            }
        );

        assert!(VecStorage::new(vec![0; 4]).split(u64::MAX, 2).is_err());
    }
}
