//! # tomo-volume library
//!
//! This crate provides the engineering core of a 3D tomographic stack viewer:
//! loading a folder of 2D TIFF slices into a single dense volume, computing
//! percentile-based contrast normalization for display, and the state glue a
//! viewer shell needs (render configuration, batch progress reporting, an
//! owning viewer state).
//!
//! Slices are discovered by their `.tif`/`.tiff` extension (case-sensitive)
//! and stacked in ascending lexicographic filename order. That ordering IS
//! the depth axis: there is no embedded slice index or metadata validation,
//! so callers are responsible for naming files such that sort order matches
//! physical slice order (zero-padded numeric suffixes, typically).
//!
//! Loading is sequential and cooperative. A caller-supplied progress callback
//! fires every 50th slice plus once at completion, and a [`CancelToken`] is
//! checked per slice. Multi-channel sources are collapsed to their first
//! channel, and an optional integer downsample factor subsamples each slice
//! by stride (no averaging). Any unreadable or mismatched slice aborts the
//! whole load; no partial volume is ever produced.
//!
//! Rendering itself is delegated: [`RenderSink`] is the seam to an external
//! GPU volume renderer (method, colormap, threshold, step size, turntable
//! camera), and [`ViewerState`] owns the volume lifecycle around it,
//! releasing the previous rendering handle before each new upload.
//!
//! # Examples
//!
//! Load a stack at half resolution and compute its display contrast limits:
//!
//! ```no_run
//! use tomo_volume::{VolumeLoader, compute_normalization};
//!
//! let volume = VolumeLoader::load_from_directory("scan_0042", 2)?;
//! println!("{}", volume.summary());
//!
//! let clim = compute_normalization(&volume, 1.0, 99.0);
//! let preview = volume
//!     .slice_image(volume.dim().0 / 2, clim)
//!     .expect("middle slice is in range");
//! preview.save("preview.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod enums;
pub mod normalize;
pub mod progress;
pub mod render;
pub mod viewer;
pub mod volume;
pub mod volume_loader;

pub use enums::{Colormap, RenderMethod};
pub use normalize::{Clim, compute_normalization};
pub use progress::{BatchOutcome, BatchState, CancelToken, ProgressReporter};
pub use render::{Camera, RenderConfig, RenderSink};
pub use viewer::ViewerState;
pub use volume::{Volume, VolumeSummary};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
