use super::Storage;
use crate::XContentResult;

/// Something that can be parsed out of a [`Storage`], e.g. a volume header.
pub trait FromStorage: Sized {
    type Args;

    fn from_storage(parent: Storage, args: Self::Args) -> XContentResult<Self>;
}
