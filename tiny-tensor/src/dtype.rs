use super::*;
use std::fmt;

/// Element type tag of a tensor buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    U8,
}

impl DType {
    /// Width of one element in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::U8 => 1,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::U8 => write!(f, "u8"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for u8 {}
}

/// Rust types which can be stored in a [`Tensor`].
///
/// Generic tensor algorithms are written once against this trait and instantiated for each
/// element type; arithmetic on `u8` wraps.
pub trait Element:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + fmt::Display + 'static
{
    const DTYPE: DType;

    fn buffer(storage: &Storage) -> Option<&[Self]>;

    fn buffer_mut(storage: &mut Storage) -> Option<&mut [Self]>;

    fn into_storage(data: Vec<Self>) -> Storage;

    /// Converts a linear position, used by `arange`.
    fn from_index(index: usize) -> Self;

    fn elem_add(self, rhs: Self) -> Self;

    fn elem_mul(self, rhs: Self) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn buffer(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::F32(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    fn buffer_mut(storage: &mut Storage) -> Option<&mut [Self]> {
        match storage {
            Storage::F32(data) => Some(data.as_mut_slice()),
            _ => None,
        }
    }

    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::F32(data)
    }

    fn from_index(index: usize) -> Self {
        index as f32
    }

    fn elem_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn elem_mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

impl Element for u8 {
    const DTYPE: DType = DType::U8;

    fn buffer(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::U8(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    fn buffer_mut(storage: &mut Storage) -> Option<&mut [Self]> {
        match storage {
            Storage::U8(data) => Some(data.as_mut_slice()),
            _ => None,
        }
    }

    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::U8(data)
    }

    fn from_index(index: usize) -> Self {
        index as u8
    }

    fn elem_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn elem_mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}
