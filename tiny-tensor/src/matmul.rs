use super::*;

/// Tuning knobs for [`bmm_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmmConfig {
    tile: usize,
}

impl Default for BmmConfig {
    fn default() -> Self {
        Self { tile: 64 }
    }
}

impl BmmConfig {
    /// Sets the edge length of the square output tiles processed together.
    pub fn with_tile(mut self, tile: usize) -> Self {
        self.tile = tile.max(1);
        self
    }

    pub fn tile(&self) -> usize {
        self.tile
    }
}

/// Batched matrix multiplication: `c[b, i, j] = sum_k a[b, i, k] * b[b, k, j]`.
///
/// All three tensors must be f32 of rank 3, with shapes `[batch, m, k]`, `[batch, k, n]` and
/// `[batch, m, n]`. Sums are accumulated in f32 in ascending `k` order. On any failure `c` is
/// left untouched.
pub fn bmm(c: &mut Tensor, a: &Tensor, b: &Tensor) -> Result<()> {
    bmm_with(c, a, b, &BmmConfig::default())
}

/// Same as [`bmm`], with explicit tuning.
///
/// The output is computed tile by tile, streaming contiguous row segments of `b` into each
/// output row of the tile. Every element still sums its products in ascending `k` order, so the
/// result does not depend on the tile size.
pub fn bmm_with(c: &mut Tensor, a: &Tensor, b: &Tensor, config: &BmmConfig) -> Result<()> {
    let (batch, m, k, n) = check_bmm(c, a, b)?;

    debug!("bmm [{batch}, {m}, {k}] x [{batch}, {k}, {n}], tile {}", config.tile);

    let a = a.data::<f32>()?;
    let b = b.data::<f32>()?;
    let c = c.data_mut::<f32>()?;

    let tile = config.tile;
    for p in 0..batch {
        let a = &a[p * m * k..(p + 1) * m * k];
        let b = &b[p * k * n..(p + 1) * k * n];
        let c = &mut c[p * m * n..(p + 1) * m * n];

        for i0 in (0..m).step_by(tile) {
            for j0 in (0..n).step_by(tile) {
                let j1 = j0.saturating_add(tile).min(n);
                for i in i0..i0.saturating_add(tile).min(m) {
                    let a_row = &a[i * k..(i + 1) * k];
                    let c_row = &mut c[i * n + j0..i * n + j1];
                    c_row.fill(0.0);
                    for (l, &a_val) in a_row.iter().enumerate() {
                        let b_row = &b[l * n + j0..l * n + j1];
                        for (acc, &b_val) in c_row.iter_mut().zip(b_row) {
                            *acc += a_val * b_val;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Validates operands, returning `(batch, m, k, n)`.
fn check_bmm(c: &Tensor, a: &Tensor, b: &Tensor) -> Result<(usize, usize, usize, usize)> {
    for tensor in [c, a, b] {
        tensor.ensure_live()?;
        if tensor.rank() != 3 {
            return Err(TensorError::RankMismatch {
                op: "bmm",
                expected: 3,
                got: tensor.rank(),
            });
        }
        tensor.ensure_dtype(DType::F32)?;
    }

    let (batch, m, k) = (a.dim(0), a.dim(1), a.dim(2));
    let (k2, n) = (b.dim(1), b.dim(2));

    if k != k2 || b.dim(0) != batch {
        return Err(TensorError::ShapeMismatch {
            expected: Shape::d3(batch, k, n),
            got: *b.shape(),
        });
    }

    let expected = Shape::d3(batch, m, n);
    if *c.shape() != expected {
        return Err(TensorError::ShapeMismatch {
            expected,
            got: *c.shape(),
        });
    }

    Ok((batch, m, k, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Straightforward reference kernel.
    fn naive_bmm(a: &Tensor, b: &Tensor) -> Result<Vec<f32>> {
        let (batch, m, k, n) = (a.dim(0), a.dim(1), a.dim(2), b.dim(2));
        let mut out = Vec::with_capacity(batch * m * n);
        for p in 0..batch {
            for i in 0..m {
                for j in 0..n {
                    let mut sum = 0f32;
                    for l in 0..k {
                        sum += a.get_at::<f32>(&[p, i, l])? * b.get_at::<f32>(&[p, l, j])?;
                    }
                    out.push(sum);
                }
            }
        }
        Ok(out)
    }

    #[test]
    fn test_bmm_2x2() -> Result<()> {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], Shape::d3(1, 2, 2))?;
        let b = Tensor::from_vec(vec![5.0f32, 6.0, 7.0, 8.0], Shape::d3(1, 2, 2))?;
        let mut c = Tensor::alloc(Shape::d3(1, 2, 2), DType::F32)?;

        bmm(&mut c, &a, &b)?;
        assert_eq!(c.data::<f32>()?, &[19.0, 22.0, 43.0, 50.0]);

        Ok(())
    }

    #[test]
    fn test_bmm_batches_are_independent() -> Result<()> {
        // second batch is the first one scaled by 10 on the left operand
        let a = Tensor::from_vec(
            vec![1.0f32, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0],
            Shape::d3(2, 2, 2),
        )?;
        let b = Tensor::from_vec(
            vec![5.0f32, 6.0, 7.0, 8.0, 1.0, 0.0, 0.0, 1.0],
            Shape::d3(2, 2, 2),
        )?;
        let mut c = Tensor::alloc(Shape::d3(2, 2, 2), DType::F32)?;

        bmm(&mut c, &a, &b)?;
        assert_eq!(
            c.data::<f32>()?,
            &[19.0, 22.0, 43.0, 50.0, 10.0, 20.0, 30.0, 40.0]
        );

        Ok(())
    }

    #[test]
    fn test_bmm_rectangular() -> Result<()> {
        let a = Tensor::arange::<f32>(Shape::d3(3, 4, 5))?;
        let b = Tensor::arange::<f32>(Shape::d3(3, 5, 2))?;
        let mut c = Tensor::alloc(Shape::d3(3, 4, 2), DType::F32)?;

        bmm(&mut c, &a, &b)?;
        assert_eq!(c.data::<f32>()?, naive_bmm(&a, &b)?.as_slice());

        Ok(())
    }

    #[test]
    fn test_blocked_matches_unblocked() -> Result<()> {
        let a = Tensor::arange::<f32>(Shape::d3(2, 37, 19))?;
        let mut b = Tensor::arange::<f32>(Shape::d3(2, 19, 23))?;
        b.scale(0.01f32)?;

        let mut reference = Tensor::alloc(Shape::d3(2, 37, 23), DType::F32)?;
        bmm_with(&mut reference, &a, &b, &BmmConfig::default().with_tile(usize::MAX))?;

        for tile in [1, 4, 16] {
            let mut c = Tensor::alloc(Shape::d3(2, 37, 23), DType::F32)?;
            bmm_with(&mut c, &a, &b, &BmmConfig::default().with_tile(tile))?;
            assert_eq!(c, reference, "tile {tile} changed the result");
        }

        for (got, want) in reference.data::<f32>()?.iter().zip(naive_bmm(&a, &b)?) {
            assert_relative_eq!(*got, want, max_relative = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn test_bmm_rejects_u8_without_writing() -> Result<()> {
        let a = Tensor::arange::<u8>(Shape::d3(1, 2, 2))?;
        let b = Tensor::arange::<f32>(Shape::d3(1, 2, 2))?;
        let mut c = Tensor::alloc(Shape::d3(1, 2, 2), DType::F32)?;
        c.fill(-1.0f32)?;

        assert!(matches!(
            bmm(&mut c, &a, &b),
            Err(TensorError::DTypeMismatch {
                expected: DType::F32,
                got: DType::U8
            })
        ));
        assert!(c.data::<f32>()?.iter().all(|&v| v == -1.0));

        Ok(())
    }

    #[test]
    fn test_bmm_preconditions() -> Result<()> {
        let a = Tensor::arange::<f32>(Shape::d3(1, 2, 3))?;
        let b = Tensor::arange::<f32>(Shape::d3(1, 3, 4))?;

        let mut flat = Tensor::alloc(Shape::d2(2, 4), DType::F32)?;
        assert!(matches!(
            bmm(&mut flat, &a, &b),
            Err(TensorError::RankMismatch { expected: 3, got: 2, .. })
        ));

        let mut c = Tensor::alloc(Shape::d3(1, 2, 4), DType::F32)?;
        assert!(matches!(
            bmm(&mut c, &a, &a),
            Err(TensorError::ShapeMismatch { .. })
        ));

        let mut wrong_out = Tensor::alloc(Shape::d3(1, 4, 2), DType::F32)?;
        assert!(matches!(
            bmm(&mut wrong_out, &a, &b),
            Err(TensorError::ShapeMismatch { .. })
        ));

        let other_batch = Tensor::arange::<f32>(Shape::d3(2, 3, 4))?;
        assert!(bmm(&mut c, &a, &other_batch).is_err());

        let mut released = b.clone();
        released.free();
        assert!(matches!(
            bmm(&mut c, &a, &released),
            Err(TensorError::Released)
        ));

        Ok(())
    }
}
