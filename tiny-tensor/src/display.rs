use super::*;
use std::fmt;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            return write!(f, "Tensor(released)");
        }

        writeln!(f, "Tensor(shape={}, dtype={})", self.shape, self.dtype())?;
        match &self.storage {
            Storage::F32(data) => write_nested(f, self.dims(), data, 0),
            Storage::U8(data) => write_nested(f, self.dims(), data, 0),
        }
    }
}

/// Writes `data` as nested brackets, one line per innermost row.
fn write_nested<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    dims: &[usize],
    data: &[T],
    depth: usize,
) -> fmt::Result {
    let Some((&extent, rest)) = dims.split_first() else {
        return Ok(());
    };

    write!(f, "[")?;
    if rest.is_empty() {
        for (i, value) in data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
    } else {
        let stride = data.len() / extent;
        for (i, chunk) in data.chunks(stride).enumerate() {
            if i > 0 {
                write!(f, ",\n{:indent$}", "", indent = depth + 1)?;
            }
            write_nested(f, rest, chunk, depth + 1)?;
        }
    }
    write!(f, "]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_1d() -> Result<()> {
        let tensor = Tensor::arange::<u8>(Shape::d1(3))?;
        assert_eq!(tensor.to_string(), "Tensor(shape=[3], dtype=u8)\n[0, 1, 2]");

        Ok(())
    }

    #[test]
    fn test_display_3d() -> Result<()> {
        let tensor = Tensor::arange::<f32>(Shape::d3(2, 2, 2))?;
        assert_eq!(
            tensor.to_string(),
            "Tensor(shape=[2, 2, 2], dtype=f32)\n[[[0, 1],\n  [2, 3]],\n [[4, 5],\n  [6, 7]]]"
        );

        Ok(())
    }

    #[test]
    fn test_display_released() -> Result<()> {
        let mut tensor = Tensor::arange::<f32>(Shape::d1(3))?;
        tensor.free();
        assert_eq!(tensor.to_string(), "Tensor(released)");

        Ok(())
    }
}
