use super::*;
use std::fmt;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.storage == other.storage
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Tensor");
        debug.field("shape", &self.shape).field("dtype", &self.dtype());
        match &self.storage {
            Storage::F32(data) => debug.field("elements", data),
            Storage::U8(data) => debug.field("elements", data),
        };
        debug.finish()
    }
}
