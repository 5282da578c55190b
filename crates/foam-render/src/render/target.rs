use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};

/// Color format of every render target.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Combined depth/stencil format of every render target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

static NEXT_TEXTURE_ID: AtomicU32 = AtomicU32::new(1);

/// Name of a render target's color texture.
///
/// Ids are unique within the process and never zero; a new id is issued every
/// time a target is (re)created, so an id taken before a resize no longer
/// matches the live texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    fn next() -> Self {
        loop {
            let raw = NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed);
            if let Some(id) = NonZeroU32::new(raw) {
                return Self(id);
            }
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Offscreen framebuffer: color texture + depth/stencil texture.
///
/// Never resized in place; [`RenderTarget::new`] is called again instead.
pub struct RenderTarget {
    id: TextureId,
    width: u32,
    height: u32,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl RenderTarget {
    /// Creates a `width x height` target.
    ///
    /// Dimensions are clamped to `1..=max_dimension`; out-of-range requests are
    /// logged and rendering continues at the clamped size.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let max = device.limits().max_texture_dimension_2d;
        let (w, h) = (width.clamp(1, max), height.clamp(1, max));
        if (w, h) != (width, height) {
            log::warn!("render target {width}x{height} out of range; using {w}x{h}");
        }

        let size = wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("foam-render target color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("foam-render target depth/stencil"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let id = TextureId::next();
        log::debug!("render target {} created at {w}x{h}", id.get());

        Self {
            id,
            width: w,
            height: h,
            color,
            color_view,
            depth_view,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}
