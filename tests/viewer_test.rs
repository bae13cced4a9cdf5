use std::path::Path;

use image::{GrayImage, Luma, RgbaImage};
use ndarray::ArrayView3;
use tempfile::TempDir;
use tomo_volume::{
    Camera, Colormap, RenderConfig, RenderMethod, RenderSink, ViewerState, VolumeLoaderError,
};

/// Stand-in for the GPU renderer that records every call it receives.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    Upload { shape: (usize, usize, usize) },
    Release,
    Method(RenderMethod),
    Cmap(Colormap),
    Threshold(f32),
    StepSize(f32),
    Camera(Camera),
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<Event>,
    camera: Option<Camera>,
}

impl RenderSink for RecordingSink {
    fn upload(&mut self, data: ArrayView3<'_, f32>, _config: &RenderConfig) {
        let shape = data.dim();
        assert!(data.iter().all(|v| (0.0..=1.0).contains(v)));
        self.events.push(Event::Upload { shape });
    }

    fn release(&mut self) {
        self.events.push(Event::Release);
    }

    fn set_method(&mut self, method: RenderMethod) {
        self.events.push(Event::Method(method));
    }

    fn set_cmap(&mut self, cmap: Colormap) {
        self.events.push(Event::Cmap(cmap));
    }

    fn set_threshold(&mut self, threshold: f32) {
        self.events.push(Event::Threshold(threshold));
    }

    fn set_relative_step_size(&mut self, step: f32) {
        self.events.push(Event::StepSize(step));
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
        self.events.push(Event::Camera(camera));
    }

    fn camera(&self) -> Camera {
        self.camera.unwrap_or_default()
    }

    fn render_frame(&mut self) -> RgbaImage {
        RgbaImage::new(1, 1)
    }
}

fn write_stack(dir: &Path, slices: usize, width: u32, height: u32) {
    for i in 0..slices {
        let img = GrayImage::from_fn(width, height, |x, y| Luma([(x + y + i as u32) as u8]));
        img.save(dir.join(format!("s{i:03}.tif"))).unwrap();
    }
}

#[test]
fn load_releases_previous_handle_before_upload() {
    let dir = TempDir::new().unwrap();
    write_stack(dir.path(), 2, 4, 4);

    let mut viewer = ViewerState::new(RecordingSink::default());
    let summary = viewer.load_folder(dir.path()).unwrap();
    assert_eq!(summary.slices, 2);
    assert_eq!(viewer.current_folder(), Some(dir.path()));
    assert!(viewer.volume().is_some());
    assert!(viewer.clim().is_some());

    // Second load must release before uploading the replacement.
    viewer.load_folder(dir.path()).unwrap();
    let uploads_and_releases: Vec<_> = viewer
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, Event::Upload { .. } | Event::Release))
        .cloned()
        .collect();
    assert_eq!(
        uploads_and_releases,
        vec![
            Event::Release,
            Event::Upload { shape: (2, 4, 4) },
            Event::Release,
            Event::Upload { shape: (2, 4, 4) },
        ]
    );
}

#[test]
fn failed_load_leaves_prior_state_untouched() {
    let good = TempDir::new().unwrap();
    write_stack(good.path(), 3, 4, 4);
    let bad = TempDir::new().unwrap();
    write_stack(bad.path(), 1, 4, 4);
    let mismatched = GrayImage::new(5, 4);
    mismatched.save(bad.path().join("s999.tif")).unwrap();

    let mut viewer = ViewerState::new(RecordingSink::default());
    viewer.load_folder(good.path()).unwrap();
    let events_before = viewer.sink().events.len();

    let err = viewer.load_folder(bad.path()).unwrap_err();
    assert!(matches!(err, VolumeLoaderError::DimensionMismatch { .. }));

    // Prior volume, folder, and rendering handle all survive.
    assert_eq!(viewer.current_folder(), Some(good.path()));
    assert_eq!(viewer.volume().unwrap().dim(), (3, 4, 4));
    assert_eq!(viewer.sink().events.len(), events_before);
}

#[test]
fn camera_reset_frames_the_volume() {
    let dir = TempDir::new().unwrap();
    write_stack(dir.path(), 2, 8, 4);

    let mut viewer = ViewerState::new(RecordingSink::default());
    viewer.load_folder(dir.path()).unwrap();

    let camera = viewer.sink().camera.unwrap();
    // Largest extent is the width of 8.
    assert_eq!(camera.distance, 16.0);
    assert_eq!(camera.azimuth, 45.0);
    assert_eq!(camera.elevation, 30.0);
}

#[test]
fn contrast_change_renormalizes_without_reloading() {
    let dir = TempDir::new().unwrap();
    write_stack(dir.path(), 2, 4, 4);

    let mut viewer = ViewerState::new(RecordingSink::default());
    viewer.load_folder(dir.path()).unwrap();
    let clim_before = viewer.clim().unwrap();

    viewer.set_contrast(0.0, 100.0);
    assert_eq!(viewer.contrast(), (0.0, 100.0));
    let clim_after = viewer.clim().unwrap();
    assert!(clim_after.low <= clim_before.low);
    assert!(clim_after.high >= clim_before.high);

    let uploads = viewer
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, Event::Upload { .. }))
        .count();
    assert_eq!(uploads, 2);
}

#[test]
fn setters_forward_to_the_sink_and_clamp() {
    let mut viewer = ViewerState::new(RecordingSink::default());

    viewer.set_method(RenderMethod::Iso);
    viewer.set_colormap(Colormap::Viridis);
    viewer.set_threshold(1.7);
    viewer.set_step_size(0.0);
    viewer.set_downsample(12);

    assert_eq!(viewer.config().method, RenderMethod::Iso);
    assert_eq!(viewer.config().cmap, Colormap::Viridis);
    assert_eq!(viewer.config().threshold, 1.0);
    assert_eq!(viewer.config().relative_step_size, 0.01);
    assert_eq!(viewer.config().downsample, 8);

    assert_eq!(
        viewer.sink().events,
        vec![
            Event::Method(RenderMethod::Iso),
            Event::Cmap(Colormap::Viridis),
            Event::Threshold(1.0),
            Event::StepSize(0.01),
        ]
    );
}

#[test]
fn set_contrast_without_volume_is_a_no_op_on_the_sink() {
    let mut viewer = ViewerState::new(RecordingSink::default());
    viewer.set_contrast(5.0, 95.0);
    assert_eq!(viewer.contrast(), (5.0, 95.0));
    assert!(viewer.sink().events.is_empty());
}
