//! Library crate for tiny_tensor
//!
//! A minimal N-dimensional array engine: fixed maximum rank tensors over one contiguous
//! row-major buffer, shape algebra, layout transforms and a batched matrix multiplication.

use log::{debug, trace};
use small_vec::{SmallVec, small_vec};

mod broadcast;
mod constructive;
mod dataset;
mod display;
mod dtype;
mod error;
mod math;
mod matmul;
mod misc;
mod permute;
mod random;
mod shape;
mod slicing;
mod view;

pub use crate::dataset::{Dataset, IMAGE_SIZE, NUM_CLASSES};
pub use crate::dtype::{DType, Element};
pub use crate::error::{ErrorKind, TensorError};
pub use crate::matmul::{BmmConfig, bmm, bmm_with};
pub use crate::random::{RandomSource, XorShiftRng};
pub use crate::shape::{Coords, MAX_RANK, Shape};

pub type Result<T> = std::result::Result<T, error::TensorError>;

/// Represents a multi-dimensional tensor with one of the supported element types.
///
/// The tensor exclusively owns a single contiguous, row-major buffer whose length always equals
/// the product of the shape extents. There are no views: reshape reinterprets the buffer in place,
/// while permute, expand and slice physically move elements.
///
/// A tensor can be explicitly released with [`Tensor::free`]; it then keeps its element type but
/// has no shape and no buffer, and every operation on it fails with [`TensorError::Released`].
#[derive(Clone)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
}

/// The typed backing buffer of a tensor.
#[derive(Clone, PartialEq)]
pub enum Storage {
    F32(Vec<f32>),
    U8(Vec<u8>),
}

impl Storage {
    pub fn dtype(&self) -> DType {
        match self {
            Storage::F32(_) => DType::F32,
            Storage::U8(_) => DType::U8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::F32(data) => data.len(),
            Storage::U8(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocates a zero-filled buffer, reporting allocation failure instead of aborting.
    fn zeroed(dtype: DType, len: usize) -> Result<Storage> {
        Ok(match dtype {
            DType::F32 => Storage::F32(zeroed_vec(len)?),
            DType::U8 => Storage::U8(zeroed_vec(len)?),
        })
    }

    /// Same as `clone`, but with fallible allocation.
    fn try_clone(&self) -> Result<Storage> {
        Ok(match self {
            Storage::F32(data) => Storage::F32(copied_vec(data)?),
            Storage::U8(data) => Storage::U8(copied_vec(data)?),
        })
    }

    fn empty(dtype: DType) -> Storage {
        match dtype {
            DType::F32 => Storage::F32(Vec::new()),
            DType::U8 => Storage::U8(Vec::new()),
        }
    }

    fn release(&mut self) {
        *self = Storage::empty(self.dtype());
    }

    /// Writes `self[i] = src[source_index(i)]` for every slot of `self`.
    fn gather_from(&mut self, src: &Storage, source_index: impl FnMut(usize) -> usize) -> Result<()> {
        match (self, src) {
            (Storage::F32(dst), Storage::F32(src)) => gather(dst, src, source_index),
            (Storage::U8(dst), Storage::U8(src)) => gather(dst, src, source_index),
            (dst, src) => {
                return Err(TensorError::DTypeMismatch {
                    expected: dst.dtype(),
                    got: src.dtype(),
                });
            }
        }
        Ok(())
    }

    /// Writes `self[target_index(i)] = src[i]` for every slot of `src`.
    fn scatter_from(&mut self, src: &Storage, target_index: impl FnMut(usize) -> usize) -> Result<()> {
        match (self, src) {
            (Storage::F32(dst), Storage::F32(src)) => scatter(dst, src, target_index),
            (Storage::U8(dst), Storage::U8(src)) => scatter(dst, src, target_index),
            (dst, src) => {
                return Err(TensorError::DTypeMismatch {
                    expected: dst.dtype(),
                    got: src.dtype(),
                });
            }
        }
        Ok(())
    }
}

fn zeroed_vec<T: Copy + Default>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| TensorError::Allocation {
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    data.resize(len, T::default());
    Ok(data)
}

fn copied_vec<T: Copy + Default>(src: &[T]) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(src.len())
        .map_err(|_| TensorError::Allocation {
            bytes: src.len().saturating_mul(size_of::<T>()),
        })?;
    data.extend_from_slice(src);
    Ok(data)
}

fn gather<T: Copy>(dst: &mut [T], src: &[T], mut source_index: impl FnMut(usize) -> usize) {
    for (i, slot) in dst.iter_mut().enumerate() {
        *slot = src[source_index(i)];
    }
}

fn scatter<T: Copy>(dst: &mut [T], src: &[T], mut target_index: impl FnMut(usize) -> usize) {
    for (i, &value) in src.iter().enumerate() {
        dst[target_index(i)] = value;
    }
}
