//! Render configuration and the seam to the external rendering collaborator.
//!
//! The actual volume rendering (ray compositing, colormapping, the GPU work)
//! lives outside this crate. [`RenderSink`] models what the core needs from
//! that collaborator and nothing more: take an array plus a configuration,
//! allow reconfiguring method/colormap/threshold/step size in place, expose a
//! turntable camera, and hand back the current frame as pixels.

use crate::enums::{Colormap, RenderMethod};

use image::RgbaImage;
use ndarray::ArrayView3;

/// Turntable camera parameters, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 500.0,
            azimuth: 45.0,
            elevation: 30.0,
            fov: 60.0,
        }
    }
}

/// Inputs to the rendering collaborator.
///
/// `threshold` only affects isosurface rendering; `relative_step_size` trades
/// ray-marching quality against speed; `downsample` is consumed by the loader
/// at load time, not by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub method: RenderMethod,
    pub cmap: Colormap,
    pub threshold: f32,
    pub relative_step_size: f32,
    pub downsample: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            method: RenderMethod::Mip,
            cmap: Colormap::Grays,
            threshold: 0.5,
            relative_step_size: 0.2,
            downsample: 1,
        }
    }
}

impl RenderConfig {
    /// Clamp all fields into their documented ranges: threshold 0-1, step
    /// size 0.01-1, downsample 1-8.
    pub fn clamped(mut self) -> Self {
        self.threshold = self.threshold.clamp(0.0, 1.0);
        self.relative_step_size = self.relative_step_size.clamp(0.01, 1.0);
        self.downsample = self.downsample.clamp(1, 8);
        self
    }
}

/// The external rendering collaborator, as seen by the viewer core.
///
/// A sink holds at most one uploaded volume. [`upload`](Self::upload) replaces
/// it wholesale; the in-place setters reconfigure the current scene without
/// re-uploading data.
pub trait RenderSink {
    /// Upload normalized (0-1) volume data together with its configuration.
    fn upload(&mut self, data: ArrayView3<'_, f32>, config: &RenderConfig);

    /// Release the currently uploaded volume, if any. Called before every
    /// re-upload so the collaborator never holds two volumes at once.
    fn release(&mut self);

    fn set_method(&mut self, method: RenderMethod);

    fn set_cmap(&mut self, cmap: Colormap);

    fn set_threshold(&mut self, threshold: f32);

    fn set_relative_step_size(&mut self, step: f32);

    fn set_camera(&mut self, camera: Camera);

    fn camera(&self) -> Camera;

    /// Render the current frame to a pixel buffer.
    fn render_frame(&mut self) -> RgbaImage;
}
