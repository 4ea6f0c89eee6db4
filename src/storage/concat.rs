use super::{IStorage, Storage};
use crate::XContentResult;

/// Several storages laid end to end, read as one. Removable drives keep their
/// FATX image split over `Data0000`, `Data0001`, ... files.
#[derive(Debug)]
pub struct ConcatStorage {
    // (start offset, part), sorted by start offset
    parts: Vec<(u64, Storage)>,
    len: u64,
}

impl ConcatStorage {
    pub fn new(parts: impl IntoIterator<Item = Storage>) -> XContentResult<Storage> {
        let mut len = 0;
        let mut out = Vec::new();

        for part in parts {
            let part_len = part.length()?;
            out.push((len, part));
            len += part_len;
        }

        Ok(Self { parts: out, len }.into_storage())
    }

    fn part_for(&self, offset: u64) -> Option<usize> {
        match self.parts.binary_search_by_key(&offset, |(start, _)| *start) {
            Ok(mut idx) => {
                // skip over empty parts sharing the same start
                while idx + 1 < self.parts.len() && self.parts[idx + 1].0 == offset {
                    idx += 1;
                }
                Some(idx)
            }
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }
}

impl IStorage for ConcatStorage {
    fn read_at(&self, mut offset: u64, mut buf: &mut [u8]) -> XContentResult<u64> {
        let mut total = 0;

        while !buf.is_empty() && offset < self.len {
            let Some(idx) = self.part_for(offset) else {
                break;
            };
            let (start, part) = &self.parts[idx];

            let read = part.read_at(offset - start, buf)?;
            if read == 0 {
                break;
            }

            total += read;
            offset += read;
            buf = &mut buf[read as usize..];
        }

        Ok(total)
    }

    fn length(&self) -> XContentResult<u64> {
        Ok(self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::ConcatStorage;
    use crate::{storage::VecStorage, XContentResult};

    #[test]
    fn reads_across_part_boundaries() -> XContentResult<()> {
        let storage = ConcatStorage::new([
            VecStorage::new(vec![0, 1, 2]),
            VecStorage::new(Vec::<u8>::new()),
            VecStorage::new(vec![3, 4]),
            VecStorage::new(vec![5, 6, 7, 8]),
        ])?;

        assert_eq!(storage.length()?, 9);

        let mut buf = [0; 5];
        assert_eq!(storage.read_at(2, &mut buf)?, 5);
        assert_eq!(buf, [2, 3, 4, 5, 6]);

        let mut buf = [0; 4];
        assert_eq!(storage.read_at(7, &mut buf)?, 2);
        assert_eq!(&buf[..2], &[7, 8]);

        assert_eq!(storage.read_at(9, &mut buf)?, 0);

        Ok(())
    }
}
