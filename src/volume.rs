use crate::normalize::Clim;

use image::ImageBuffer;
use image::Luma;
use ndarray::Array3;
use ndarray::s;
use rayon::prelude::*;
use std::fmt;

/// A dense 3D stack of intensity samples, addressed `(depth, row, col)`.
///
/// Depth order is whatever order the slices were handed to the loader; for
/// directory loads that is ascending lexicographic filename order.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    data: Array3<f32>,
    min: f32,
    max: f32,
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        let (min, max) = data.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), &v| (min.min(v), max.max(v)),
        );
        Self { data, min, max }
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Get a mutable reference to the underlying data
    pub fn data_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    /// Smallest sample value observed at construction.
    pub fn min_value(&self) -> f32 {
        self.min
    }

    /// Largest sample value observed at construction.
    pub fn max_value(&self) -> f32 {
        self.max
    }

    /// Memory footprint of the sample data in bytes.
    pub fn nbytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    pub fn summary(&self) -> VolumeSummary {
        let (slices, height, width) = self.dim();
        VolumeSummary {
            slices,
            height,
            width,
            nbytes: self.nbytes(),
            min: self.min,
            max: self.max,
        }
    }

    /// Render one axial slice to an 8-bit grayscale image through the given
    /// contrast limits. Returns `None` if `index` is out of range.
    pub fn slice_image(&self, index: usize, clim: Clim) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        if index >= self.dim().0 {
            return None;
        }
        let slice = self.data.slice(s![index, .., ..]);
        let (height, width) = slice.dim();
        let pixel_data: Vec<u8> = slice
            .into_par_iter()
            .map(|&v| (clim.apply(v) * 255.0) as u8)
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }
}

/// Summary statistics of one load, suitable for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSummary {
    pub slices: usize,
    pub height: usize,
    pub width: usize,
    pub nbytes: usize,
    pub min: f32,
    pub max: f32,
}

impl fmt::Display for VolumeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded: {} slices", self.slices)?;
        writeln!(f, "Size: ({}, {}, {})", self.slices, self.height, self.width)?;
        writeln!(f, "Memory: {:.1} MB", self.nbytes as f64 / (1024.0 * 1024.0))?;
        write!(f, "Range: [{:.1}, {:.1}]", self.min, self.max)
    }
}
