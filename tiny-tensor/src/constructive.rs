use super::*;

impl Tensor {
    /// Allocates a tensor of the given shape and element type.
    ///
    /// The shape must have a rank in `1..=MAX_RANK` and no zero extent. Allocation failure is
    /// reported as [`TensorError::Allocation`], separately from shape errors. The buffer happens
    /// to be zero-filled, but callers are expected to fill it before reading.
    pub fn alloc(shape: Shape, dtype: DType) -> Result<Tensor> {
        shape.validate()?;

        let size = shape.checked_numel().ok_or(TensorError::Allocation { bytes: usize::MAX })?;
        let storage = Storage::zeroed(dtype, size)?;

        debug!(
            "allocated {dtype} tensor {shape} ({} bytes)",
            size * dtype.size_in_bytes()
        );

        Ok(Tensor { storage, shape })
    }

    /// Creates a tensor which takes ownership of `data`.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: Shape) -> Result<Tensor> {
        shape.validate()?;

        if shape.checked_numel() != Some(data.len()) {
            return Err(TensorError::ReshapeMismatch {
                size: data.len(),
                to: shape,
            });
        }

        Ok(Tensor {
            storage: T::into_storage(data),
            shape,
        })
    }

    /// Creates a tensor filled with its own linear indices: 0, 1, 2, ...
    pub fn arange<T: Element>(shape: Shape) -> Result<Tensor> {
        let mut tensor = Tensor::alloc(shape, T::DTYPE)?;
        for (i, value) in tensor.data_mut::<T>()?.iter_mut().enumerate() {
            *value = T::from_index(i);
        }
        Ok(tensor)
    }

    /// Releases the buffer and resets the tensor to the empty state.
    ///
    /// Freeing a released tensor is a no-op. Dropping a tensor frees it as well.
    pub fn free(&mut self) {
        if !self.is_released() {
            trace!("releasing tensor {}", self.shape);
        }
        self.storage.release();
        self.shape = Shape::empty();
    }

    /// Moves the buffer out into a new tensor, leaving this one released.
    pub fn take(&mut self) -> Tensor {
        let mut taken = Tensor {
            storage: Storage::empty(self.dtype()),
            shape: Shape::empty(),
        };
        std::mem::swap(self, &mut taken);
        taken
    }

    pub fn is_released(&self) -> bool {
        self.shape.rank() == 0
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.is_released() {
            Err(TensorError::Released)
        } else {
            Ok(())
        }
    }

    pub(crate) fn ensure_dtype(&self, expected: DType) -> Result<()> {
        if self.dtype() == expected {
            Ok(())
        } else {
            Err(TensorError::DTypeMismatch {
                expected,
                got: self.dtype(),
            })
        }
    }
}
