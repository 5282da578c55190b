/// Straight-alpha RGBA color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Target clear color (dark gray).
    pub const BACKGROUND: Self = Self::new(0.117, 0.117, 0.117, 1.0);

    /// Synthesized per-vertex color when an upload carries none (pale blue).
    pub const DEFAULT_VERTEX: Self = Self::new(0.5, 0.7, 1.0, 1.0);

    /// Edge color in pure wireframe mode.
    pub const WIREFRAME_EDGE: Self = Self::new(0.25, 0.5, 1.0, 1.0);

    /// Edge color when outlining a shaded surface.
    pub const OVERLAY_EDGE: Self = Self::new(0.0, 0.0, 0.0, 0.3);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Quantizes to the byte values an `Rgba8Unorm` target stores.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
