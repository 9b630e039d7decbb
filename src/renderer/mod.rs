//! 2D rendering module
//!
//! The render pass draws through the [`Surface`] trait; the browser backend
//! wraps a canvas 2D context and the recording backend captures calls.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod frame;
pub mod recording;
pub mod shapes;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use frame::{hover_caption, render};
pub use recording::{DrawCmd, RecordingSurface};
pub use surface::{ColorStop, Paint, Path, PathCmd, Rgba, Surface, TextAlign};
