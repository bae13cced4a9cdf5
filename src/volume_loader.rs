use crate::progress::CancelToken;
use crate::volume::Volume;

use image::{DynamicImage, GenericImageView};
use ndarray::{Array2, Array3, s};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// How often the progress callback fires during a load, in slices.
const PROGRESS_INTERVAL: usize = 50;

/// Slice file extensions recognized during discovery. Matching is
/// case-sensitive: `IMG.TIF` is not a slice.
const SLICE_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no .tif/.tiff slices found in {}", .0.display())]
    EmptyStack(PathBuf),

    #[error("slice {} is {found:?}, expected {expected:?}", .path.display())]
    DimensionMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("failed to read slice {}: {source}", .path.display())]
    SliceRead {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("load cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// List the slice files of a stack directory.
    ///
    /// Returns the `.tif`/`.tiff` files in `path`, sorted by filename in
    /// ascending lexicographic order. That order IS the depth axis of the
    /// loaded volume; callers rely on filenames sorting in physical slice
    /// order, there is no embedded index to validate against.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::NotFound`] if `path` does not exist and
    /// [`VolumeLoaderError::EmptyStack`] if no slice files match.
    pub fn discover_slices(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, VolumeLoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VolumeLoaderError::NotFound(path.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| SLICE_EXTENSIONS.contains(&ext))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::EmptyStack(path.to_path_buf()));
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Load a volume from a directory containing a TIFF slice stack.
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        downsample_factor: usize,
    ) -> Result<Volume, VolumeLoaderError> {
        Self::load_from_directory_with_progress(
            path,
            downsample_factor,
            |_, _| {},
            &CancelToken::new(),
        )
    }

    /// Load a volume, reporting progress and honoring cancellation.
    ///
    /// `progress` is invoked as `(completed, total)` with strictly increasing
    /// `completed` values at a bounded frequency (every 50th slice), with a
    /// final `(total, total)` call on completion. Interactive callers may pump
    /// UI events inside the callback. `cancel` is checked once per slice.
    ///
    /// # Errors
    ///
    /// Any per-file failure aborts the whole load; no partial volume is
    /// returned. See [`VolumeLoaderError`] for the failure conditions.
    pub fn load_from_directory_with_progress(
        path: impl AsRef<Path>,
        downsample_factor: usize,
        progress: impl FnMut(usize, usize),
        cancel: &CancelToken,
    ) -> Result<Volume, VolumeLoaderError> {
        let paths = Self::discover_slices(path)?;
        Self::load_from_file_paths(&paths, downsample_factor, progress, cancel)
    }

    /// Load a volume from explicit slice paths, in the given order.
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path>],
        downsample_factor: usize,
        mut progress: impl FnMut(usize, usize),
        cancel: &CancelToken,
    ) -> Result<Volume, VolumeLoaderError> {
        let Some(first_path) = paths.first() else {
            return Err(VolumeLoaderError::EmptyStack(PathBuf::new()));
        };
        let factor = downsample_factor.max(1);
        let total = paths.len();
        log::info!("loading {total} slices (downsample factor {factor})");

        if cancel.is_cancelled() {
            return Err(VolumeLoaderError::Cancelled);
        }

        // First slice establishes the reference dimensions.
        let first = Self::decode_slice(first_path.as_ref(), factor)?;
        let (height, width) = first.dim();

        let mut data = Array3::<f32>::zeros((total, height, width));
        data.slice_mut(s![0, .., ..]).assign(&first);
        progress(1, total);
        let mut last_reported = 1;

        for (i, path) in paths.iter().enumerate().skip(1) {
            if cancel.is_cancelled() {
                return Err(VolumeLoaderError::Cancelled);
            }

            let slice = Self::decode_slice(path.as_ref(), factor)?;
            if slice.dim() != (height, width) {
                return Err(VolumeLoaderError::DimensionMismatch {
                    path: path.as_ref().to_path_buf(),
                    expected: (height, width),
                    found: slice.dim(),
                });
            }
            data.slice_mut(s![i, .., ..]).assign(&slice);

            if i % PROGRESS_INTERVAL == 0 {
                log::debug!("loaded {}/{total} slices", i + 1);
                progress(i + 1, total);
                last_reported = i + 1;
            }
        }

        if last_reported != total {
            progress(total, total);
        }

        let volume = Volume::new(data);
        log::info!(
            "load complete: {:?}, {:.1} MB",
            volume.dim(),
            volume.nbytes() as f64 / (1024.0 * 1024.0)
        );
        Ok(volume)
    }

    /// Decode one slice file to a 2D float array, first channel only,
    /// optionally subsampled by `factor` along both axes.
    fn decode_slice(path: &Path, factor: usize) -> Result<Array2<f32>, VolumeLoaderError> {
        let image = image::open(path).map_err(|source| VolumeLoaderError::SliceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::downsample(Self::first_channel(&image), factor))
    }

    /// Collapse a decoded image to its first channel, as f32. No luminance
    /// conversion: for an RGB source this is the red channel, verbatim.
    fn first_channel(image: &DynamicImage) -> Array2<f32> {
        let (width, height) = image.dimensions();
        let samples = match image {
            DynamicImage::ImageLuma8(buf) => Self::strided(buf.as_raw(), 1, |v: u8| v as f32),
            DynamicImage::ImageLumaA8(buf) => Self::strided(buf.as_raw(), 2, |v: u8| v as f32),
            DynamicImage::ImageRgb8(buf) => Self::strided(buf.as_raw(), 3, |v: u8| v as f32),
            DynamicImage::ImageRgba8(buf) => Self::strided(buf.as_raw(), 4, |v: u8| v as f32),
            DynamicImage::ImageLuma16(buf) => Self::strided(buf.as_raw(), 1, |v: u16| v as f32),
            DynamicImage::ImageLumaA16(buf) => Self::strided(buf.as_raw(), 2, |v: u16| v as f32),
            DynamicImage::ImageRgb16(buf) => Self::strided(buf.as_raw(), 3, |v: u16| v as f32),
            DynamicImage::ImageRgba16(buf) => Self::strided(buf.as_raw(), 4, |v: u16| v as f32),
            DynamicImage::ImageRgb32F(buf) => Self::strided(buf.as_raw(), 3, |v: f32| v),
            DynamicImage::ImageRgba32F(buf) => Self::strided(buf.as_raw(), 4, |v: f32| v),
            other => {
                let rgba = other.to_rgba32f();
                Self::strided(rgba.as_raw(), 4, |v: f32| v)
            }
        };
        Array2::from_shape_vec((height as usize, width as usize), samples)
            .expect("sample count matches image dimensions")
    }

    fn strided<T: Copy>(raw: &[T], channels: usize, convert: impl Fn(T) -> f32) -> Vec<f32> {
        raw.iter().step_by(channels).copied().map(convert).collect()
    }

    /// Subsample by taking every `factor`-th row and column. Strided, not
    /// averaged: a quality/speed trade-off, the kept samples are verbatim.
    /// Output dimensions are floor-divided by `factor`.
    fn downsample(slice: Array2<f32>, factor: usize) -> Array2<f32> {
        if factor <= 1 {
            return slice;
        }
        let (height, width) = slice.dim();
        let (rows, cols) = (height / factor * factor, width / factor * factor);
        slice.slice_move(s![..rows;factor, ..cols;factor])
    }
}
