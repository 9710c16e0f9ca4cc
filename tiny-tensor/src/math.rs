use super::*;

impl Tensor {
    /// Elementwise `self += other`.
    pub fn add(&mut self, other: &Tensor) -> Result<()> {
        self.zip_apply(other, "add", |a, b| a.elem_add(b), |a, b| a.elem_add(b))
    }

    /// Elementwise `self *= other`.
    pub fn mul(&mut self, other: &Tensor) -> Result<()> {
        self.zip_apply(other, "mul", |a, b| a.elem_mul(b), |a, b| a.elem_mul(b))
    }

    /// Copies the content of `src`, which must have the same shape and element type.
    pub fn copy_from(&mut self, src: &Tensor) -> Result<()> {
        self.zip_apply(src, "copy", |_, b| b, |_, b| b)
    }

    /// Computes `self += a * x` over f32 tensors of the same shape.
    pub fn axpy(&mut self, a: f32, x: &Tensor) -> Result<()> {
        self.check_operand(x, "axpy")?;
        let x = x.data::<f32>()?;
        zip_in_place(self.data_mut::<f32>()?, x, |y, x| y + a * x);
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill<T: Element>(&mut self, value: T) -> Result<()> {
        self.data_mut::<T>()?.fill(value);
        Ok(())
    }

    /// Sets every element to zero.
    pub fn zero(&mut self) -> Result<()> {
        match self.dtype() {
            DType::F32 => self.fill(0f32),
            DType::U8 => self.fill(0u8),
        }
    }

    /// Multiplies every element by `a`.
    pub fn scale<T: Element>(&mut self, a: T) -> Result<()> {
        for value in self.data_mut::<T>()? {
            *value = value.elem_mul(a);
        }
        Ok(())
    }

    /// Checks operands of a binary elementwise op, then applies the typed kernel pairwise.
    /// Nothing is written when the check fails.
    fn zip_apply(
        &mut self,
        other: &Tensor,
        op: &str,
        f32_op: impl Fn(f32, f32) -> f32,
        u8_op: impl Fn(u8, u8) -> u8,
    ) -> Result<()> {
        self.check_operand(other, op)?;

        match (&mut self.storage, &other.storage) {
            (Storage::F32(dst), Storage::F32(src)) => zip_in_place(dst, src, f32_op),
            (Storage::U8(dst), Storage::U8(src)) => zip_in_place(dst, src, u8_op),
            (dst, src) => {
                return Err(TensorError::DTypeMismatch {
                    expected: dst.dtype(),
                    got: src.dtype(),
                });
            }
        }

        Ok(())
    }

    fn check_operand(&self, other: &Tensor, op: &str) -> Result<()> {
        self.ensure_live()?;
        other.ensure_live()?;

        if !self.same_shape(other) {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape,
                got: other.shape,
            });
        }

        trace!("{op} on {} tensor {}", self.dtype(), self.shape);
        Ok(())
    }
}

fn zip_in_place<T: Copy>(dst: &mut [T], src: &[T], op: impl Fn(T, T) -> T) {
    for (a, &b) in dst.iter_mut().zip(src) {
        *a = op(*a, b);
    }
}
