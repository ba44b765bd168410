//! Rendering
//!
//! Frames are composited in software from the sprite set, then handed to
//! WebGPU for presentation.

pub mod canvas;
pub mod present;
pub mod scene;
pub mod text;

pub use present::{FramePresenter, PresentError};
pub use scene::SceneRenderer;
