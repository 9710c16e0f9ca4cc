use super::*;
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

/// Number of pixels of one 28x28 image.
pub const IMAGE_SIZE: usize = 784;

/// Number of label classes.
pub const NUM_CLASSES: usize = 10;

/// A labelled image dataset held in two tensors: `u8` labels of shape `[n]` and `f32` pixel
/// intensities in `[0, 1]` of shape `[n, 784]`.
#[derive(Clone, Debug)]
pub struct Dataset {
    n: usize,
    labels: Tensor,
    pixels: Tensor,
}

impl Dataset {
    /// Builds a dataset from its two tensors, checking their shapes and element types.
    pub fn new(labels: Tensor, pixels: Tensor) -> Result<Dataset> {
        labels.ensure_dtype(DType::U8)?;
        pixels.ensure_dtype(DType::F32)?;

        let n = labels.dim(0);
        if labels.rank() != 1 {
            return Err(TensorError::RankMismatch {
                op: "dataset labels",
                expected: 1,
                got: labels.rank(),
            });
        }

        let expected = Shape::d2(n, IMAGE_SIZE);
        if *pixels.shape() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: *pixels.shape(),
            });
        }

        Ok(Dataset { n, labels, pixels })
    }

    /// Loads a CSV file with a header line followed by rows of `label,p0,...,p783`.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        debug!("loading csv dataset from {}", path.display());
        Self::from_csv_reader(BufReader::new(File::open(path)?))
    }

    /// Parses CSV content, see [`Dataset::load_csv`].
    ///
    /// Pixels are integers in `0..=255` and are scaled into `[0, 1]`. A row whose label is not a
    /// digit ends the data; a malformed pixel is an error.
    pub fn from_csv_reader(reader: impl BufRead) -> Result<Dataset> {
        let mut lines = reader.lines();
        if lines.next().transpose()?.is_none() {
            return Err(TensorError::Dataset("missing csv header".to_string()));
        }

        let mut labels = Vec::new();
        let mut pixels = Vec::new();

        for (row, line) in lines.enumerate() {
            let line = line?;
            let mut fields = line.trim_end().split(',');

            let label = fields
                .next()
                .and_then(|field| field.trim().parse::<u8>().ok())
                .filter(|&label| (label as usize) < NUM_CLASSES);
            let Some(label) = label else {
                warn!("stopping at csv row {row}: invalid label");
                break;
            };

            for column in 0..IMAGE_SIZE {
                let value = fields
                    .next()
                    .and_then(|field| field.trim().parse::<u8>().ok())
                    .ok_or_else(|| {
                        TensorError::Dataset(format!("invalid pixel {column} in csv row {row}"))
                    })?;
                pixels.push(f32::from(value) / 255.0);
            }
            labels.push(label);
        }

        Self::from_parts(labels, pixels)
    }

    /// Loads a label file of `n` raw bytes and a pixel file of `n * 784` little-endian f32 values.
    pub fn load_bin(labels_path: impl AsRef<Path>, pixels_path: impl AsRef<Path>) -> Result<Dataset> {
        let labels_path = labels_path.as_ref();
        let pixels_path = pixels_path.as_ref();
        debug!(
            "loading binary dataset from {} and {}",
            labels_path.display(),
            pixels_path.display()
        );

        Self::from_bytes(&std::fs::read(labels_path)?, &std::fs::read(pixels_path)?)
    }

    /// Decodes the binary layout read by [`Dataset::load_bin`].
    pub fn from_bytes(labels: &[u8], pixels: &[u8]) -> Result<Dataset> {
        let width = DType::F32.size_in_bytes();
        let expected = labels.len() * IMAGE_SIZE * width;
        if pixels.len() != expected {
            return Err(TensorError::Dataset(format!(
                "pixel data has {} bytes, expected {expected} for {} labels",
                pixels.len(),
                labels.len()
            )));
        }

        let pixels = pixels
            .chunks_exact(width)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Self::from_parts(labels.to_vec(), pixels)
    }

    fn from_parts(labels: Vec<u8>, pixels: Vec<f32>) -> Result<Dataset> {
        let n = labels.len();
        if n == 0 {
            return Err(TensorError::Dataset("dataset has no samples".to_string()));
        }

        debug!("loaded {n} samples");

        Self::new(
            Tensor::from_vec(labels, Shape::d1(n))?,
            Tensor::from_vec(pixels, Shape::d2(n, IMAGE_SIZE))?,
        )
    }

    /// Copies the samples in `range` into a fresh `(labels, pixels)` pair.
    pub fn batch(&self, range: Range<usize>) -> Result<(Tensor, Tensor)> {
        Ok((
            self.labels.slice(0, range.clone())?,
            self.pixels.slice(0, range)?,
        ))
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn labels(&self) -> &Tensor {
        &self.labels
    }

    pub fn pixels(&self) -> &Tensor {
        &self.pixels
    }
}
