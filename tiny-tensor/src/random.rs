use super::*;

/// A source of random f32 values used to initialize tensors.
///
/// Generators carry their own state and are passed explicitly, so a fixed seed and call sequence
/// always produce the same tensors.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f32;

    /// Standard normal sample.
    fn normal(&mut self) -> f32;
}

/// xorshift64* generator.
#[derive(Clone, Debug)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a generator; a zero seed, which would get the generator stuck, is replaced.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::DEFAULT_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(2_685_821_657_736_338_717)
    }
}

impl RandomSource for XorShiftRng {
    fn uniform(&mut self) -> f32 {
        let top24 = (self.next_u64() >> 40) as u32;
        top24 as f32 * (1.0 / 16_777_216.0)
    }

    /// Box-Muller transform, cosine branch.
    fn normal(&mut self) -> f32 {
        let u2 = self.uniform();
        let mut u1 = self.uniform();
        while u1 == 0.0 {
            u1 = self.uniform();
        }

        let magnitude = (-2.0 * u1.ln()).sqrt();
        magnitude * (std::f32::consts::TAU * u2).cos()
    }
}

impl Tensor {
    /// Fills an f32 tensor with uniform samples, one per element in linear order.
    pub fn fill_uniform(&mut self, rng: &mut impl RandomSource) -> Result<()> {
        self.fill_with(|| rng.uniform())
    }

    /// Fills an f32 tensor with standard normal samples, one per element in linear order.
    pub fn fill_normal(&mut self, rng: &mut impl RandomSource) -> Result<()> {
        self.fill_with(|| rng.normal())
    }

    fn fill_with(&mut self, mut sample: impl FnMut() -> f32) -> Result<()> {
        for value in self.data_mut::<f32>()? {
            *value = sample();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = XorShiftRng::new(42);
        let mut rng2 = XorShiftRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }

        assert_ne!(XorShiftRng::new(1).next_u64(), XorShiftRng::new(2).next_u64());
    }

    #[test]
    fn test_zero_seed_is_replaced() {
        let mut zero = XorShiftRng::new(0);
        let mut default = XorShiftRng::new(0x9E37_79B9_7F4A_7C15);
        assert_eq!(zero.next_u64(), default.next_u64());
        assert_ne!(zero.next_u64(), 0);
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = XorShiftRng::new(7);
        for _ in 0..10_000 {
            let value = rng.uniform();
            assert!((0.0..1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = XorShiftRng::new(1234);
        let samples: Vec<f32> = (0..20_000).map(|_| rng.normal()).collect();

        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / samples.len() as f32;

        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_fill_is_deterministic_and_ordered() -> Result<()> {
        let mut tensor = Tensor::alloc(Shape::d2(3, 4), DType::F32)?;
        tensor.fill_uniform(&mut XorShiftRng::new(9))?;

        let mut rng = XorShiftRng::new(9);
        let expected: Vec<f32> = (0..12).map(|_| rng.uniform()).collect();
        assert_eq!(tensor.data::<f32>()?, expected.as_slice());

        let mut normal = Tensor::alloc(Shape::d1(4), DType::F32)?;
        normal.fill_normal(&mut XorShiftRng::new(9))?;
        let mut rng = XorShiftRng::new(9);
        let expected: Vec<f32> = (0..4).map(|_| rng.normal()).collect();
        assert_eq!(normal.data::<f32>()?, expected.as_slice());

        Ok(())
    }

    #[test]
    fn test_fill_requires_f32() -> Result<()> {
        let mut labels = Tensor::alloc(Shape::d1(4), DType::U8)?;
        assert!(matches!(
            labels.fill_uniform(&mut XorShiftRng::new(1)),
            Err(TensorError::DTypeMismatch { .. })
        ));

        Ok(())
    }
}
