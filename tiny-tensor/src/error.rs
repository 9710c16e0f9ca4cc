use crate::{DType, MAX_RANK, Shape};
use thiserror::Error;

/// Errors reported by tensor operations.
///
/// Every failure is detected up front, before any destination buffer is written.
#[derive(Debug, Error)]
pub enum TensorError {
    #[error("Invalid rank {rank}: expected 1..={}", MAX_RANK)]
    InvalidRank { rank: usize },

    #[error("Zero extent on axis {axis}")]
    ZeroExtent { axis: usize },

    #[error("Cannot reshape tensor of size {size} into {to}")]
    ReshapeMismatch { size: usize, to: Shape },

    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    #[error("Shapes {lhs} and {rhs} cannot be broadcast together")]
    BroadcastIncompatible { lhs: Shape, rhs: Shape },

    #[error("{perm:?} is not a permutation of {rank} axes")]
    InvalidPermutation { perm: Vec<usize>, rank: usize },

    #[error("Index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },

    #[error("Axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("{op} expects rank {expected}, got {got}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Slice {start}..{end} out of range for extent {extent}")]
    SliceOutOfRange {
        start: usize,
        end: usize,
        extent: usize,
    },

    #[error("Slice destination extent on axis {axis} is {got}, window length is {expected}")]
    SliceExtentMismatch {
        axis: usize,
        expected: usize,
        got: usize,
    },

    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },

    #[error("Failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("Tensor buffer has been released")]
    Released,

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure categories, letting callers tell bad input apart from resource exhaustion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid rank or extents, or incompatible shapes.
    Shape,
    /// Element type mismatch between operands.
    Type,
    /// Allocation failure.
    Resource,
    /// Released tensors, wrong rank for an operation, bad axis or permutation.
    Precondition,
    /// Reading or parsing external data.
    Io,
}

impl TensorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TensorError::InvalidRank { .. }
            | TensorError::ZeroExtent { .. }
            | TensorError::ReshapeMismatch { .. }
            | TensorError::ShapeMismatch { .. }
            | TensorError::BroadcastIncompatible { .. }
            | TensorError::SliceOutOfRange { .. }
            | TensorError::SliceExtentMismatch { .. } => ErrorKind::Shape,
            TensorError::DTypeMismatch { .. } => ErrorKind::Type,
            TensorError::Allocation { .. } => ErrorKind::Resource,
            TensorError::InvalidPermutation { .. }
            | TensorError::IndexOutOfRange { .. }
            | TensorError::AxisOutOfRange { .. }
            | TensorError::RankMismatch { .. }
            | TensorError::Released => ErrorKind::Precondition,
            TensorError::Dataset(_) | TensorError::Io(_) => ErrorKind::Io,
        }
    }
}
