//! Owning state of the volume viewer.
//!
//! Everything a viewer window would scatter across widget attributes lives
//! here explicitly: the current folder, the loaded volume, the contrast
//! percentiles, the render configuration, and the rendering collaborator.

use crate::enums::{Colormap, RenderMethod};
use crate::normalize::{self, Clim, DEFAULT_HIGH_PERCENTILE, DEFAULT_LOW_PERCENTILE};
use crate::progress::CancelToken;
use crate::render::{Camera, RenderConfig, RenderSink};
use crate::volume::{Volume, VolumeSummary};
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

use std::path::{Path, PathBuf};

pub struct ViewerState<S: RenderSink> {
    sink: S,
    config: RenderConfig,
    contrast: (f32, f32),
    current_folder: Option<PathBuf>,
    volume: Option<Volume>,
    clim: Option<Clim>,
}

impl<S: RenderSink> ViewerState<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            config: RenderConfig::default(),
            contrast: (DEFAULT_LOW_PERCENTILE, DEFAULT_HIGH_PERCENTILE),
            current_folder: None,
            volume: None,
            clim: None,
        }
    }

    /// Load a slice stack and hand the normalized volume to the sink.
    ///
    /// Loads are serialized by `&mut self`; a failed load returns before any
    /// state is touched, so the previously shown volume stays intact. On
    /// success the previous rendering handle is released before the new
    /// upload, then the camera is reset to frame the new volume.
    pub fn load_folder(&mut self, folder: impl AsRef<Path>) -> Result<VolumeSummary, VolumeLoaderError> {
        self.load_folder_with_progress(folder, |_, _| {}, &CancelToken::new())
    }

    /// [`load_folder`](Self::load_folder) with a progress callback and a
    /// cancellation token, both threaded through to the loader.
    pub fn load_folder_with_progress(
        &mut self,
        folder: impl AsRef<Path>,
        progress: impl FnMut(usize, usize),
        cancel: &CancelToken,
    ) -> Result<VolumeSummary, VolumeLoaderError> {
        let folder = folder.as_ref();
        let volume = VolumeLoader::load_from_directory_with_progress(
            folder,
            self.config.downsample,
            progress,
            cancel,
        )?;

        let clim = normalize::compute_normalization(&volume, self.contrast.0, self.contrast.1);
        let normalized = normalize::apply(&volume, clim);

        self.sink.release();
        self.sink.upload(normalized.view(), &self.config);

        let summary = volume.summary();
        self.current_folder = Some(folder.to_path_buf());
        self.volume = Some(volume);
        self.clim = Some(clim);
        self.reset_camera();
        log::info!("volume uploaded from {}", folder.display());
        Ok(summary)
    }

    pub fn set_method(&mut self, method: RenderMethod) {
        self.config.method = method;
        self.sink.set_method(method);
    }

    pub fn set_colormap(&mut self, cmap: Colormap) {
        self.config.cmap = cmap;
        self.sink.set_cmap(cmap);
    }

    /// Threshold for isosurface rendering, as a 0-1 fraction.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.config.threshold = threshold.clamp(0.0, 1.0);
        self.sink.set_threshold(self.config.threshold);
    }

    /// Ray-marching step size relative to voxel size, as a 0-1 fraction.
    pub fn set_step_size(&mut self, step: f32) {
        self.config.relative_step_size = step.clamp(0.01, 1.0);
        self.sink.set_relative_step_size(self.config.relative_step_size);
    }

    /// Downsample factor applied by the next load. Does not reload.
    pub fn set_downsample(&mut self, factor: usize) {
        self.config.downsample = factor.clamp(1, 8);
    }

    /// Change the contrast percentiles and re-normalize the loaded volume.
    ///
    /// The raw volume is kept, so this recomputes the contrast limits and
    /// re-uploads without touching the filesystem.
    pub fn set_contrast(&mut self, low_percentile: f32, high_percentile: f32) {
        self.contrast = (low_percentile, high_percentile);
        if let Some(volume) = &self.volume {
            let clim = normalize::compute_normalization(volume, low_percentile, high_percentile);
            let normalized = normalize::apply(volume, clim);
            self.sink.release();
            self.sink.upload(normalized.view(), &self.config);
            self.clim = Some(clim);
        }
    }

    /// Frame the loaded volume: distance twice the largest extent, azimuth
    /// 45, elevation 30. No-op without a volume.
    pub fn reset_camera(&mut self) {
        let Some(volume) = &self.volume else {
            return;
        };
        let (depth, height, width) = volume.dim();
        let max_dim = depth.max(height).max(width);
        self.sink.set_camera(Camera {
            distance: max_dim as f32 * 2.0,
            ..Camera::default()
        });
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn contrast(&self) -> (f32, f32) {
        self.contrast
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.current_folder.as_deref()
    }

    pub fn volume(&self) -> Option<&Volume> {
        self.volume.as_ref()
    }

    pub fn clim(&self) -> Option<Clim> {
        self.clim
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
