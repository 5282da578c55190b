//! Colors used by the renderer.
//!
//! Colors are straight-alpha RGBA in `[0, 1]`; both pipelines blend with
//! `src_alpha / one_minus_src_alpha`.

mod color;

pub use color::Color;
