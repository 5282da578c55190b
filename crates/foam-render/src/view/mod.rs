//! Camera and display-mode state.
//!
//! Both are plain values overwritten by the caller and read by each render.

mod camera;
mod mode;

pub use camera::{CameraMatrices, ViewState, FAR_PLANE, FIELD_OF_VIEW_Y, NEAR_PLANE};
pub use mode::{DataMode, DisplayMode, Representation};
