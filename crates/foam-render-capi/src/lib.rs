//! C-linkage boundary for `foam-render`.
//!
//! Every function takes the opaque handle returned by
//! [`foam_renderer_create`]. Null handles are accepted everywhere and turn the
//! call into a no-op (queries return 0). A handle whose GPU initialization
//! failed is non-functional: it behaves like a null handle but must still be
//! released with [`foam_renderer_destroy`].
//!
//! Calls on one handle must be serialized by the caller. Panics never unwind
//! into the caller: they are logged and the neutral value is returned.

use std::panic::{catch_unwind, AssertUnwindSafe};

use foam_render::glam::Vec3;
use foam_render::logging::{init_logging, LoggingConfig};
use foam_render::mesh::{COLOR_COMPONENTS, POSITION_COMPONENTS};
use foam_render::{DataMode, DisplayMode, MeshUpload, Renderer, Representation, ViewState};

/// Renderer instance behind a C handle.
pub struct FoamRenderer {
    renderer: Option<Renderer>,
}

pub type FoamRendererHandle = *mut FoamRenderer;

/// Runs `f`, turning a panic into `fallback`.
fn guarded<T>(entry: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::error!("{entry}: panic caught at the C boundary");
            fallback
        }
    }
}

/// # Safety
/// `handle` is null or a live pointer from [`foam_renderer_create`].
unsafe fn renderer_mut<'a>(handle: FoamRendererHandle) -> Option<&'a mut Renderer> {
    unsafe { handle.as_mut() }?.renderer.as_mut()
}

/// # Safety
/// Unless null, `ptr` must be valid for reads of `len` elements.
unsafe fn slice_or_empty<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

/// Negative counts and sizes are treated as zero.
fn to_usize(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Element count of an array holding `components` values per item, or `None`
/// when it does not fit in `usize`.
fn scaled_len(count: i32, components: usize) -> Option<usize> {
    to_usize(count).checked_mul(components)
}

fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Creates a renderer with a `width x height` offscreen target.
///
/// Always returns a handle; if the GPU could not be initialized the error is
/// logged and the handle is non-functional.
#[unsafe(no_mangle)]
pub extern "C" fn foam_renderer_create(width: i32, height: i32) -> FoamRendererHandle {
    init_logging(LoggingConfig::default());

    let renderer = guarded("foam_renderer_create", None, || {
        match Renderer::new(to_u32(width), to_u32(height)) {
            Ok(renderer) => Some(renderer),
            Err(err) => {
                log::error!("renderer initialization failed: {err:#}");
                None
            }
        }
    });

    Box::into_raw(Box::new(FoamRenderer { renderer }))
}

/// Releases the renderer and all of its GPU resources.
///
/// # Safety
/// `handle` is null or a live handle; it must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_destroy(handle: FoamRendererHandle) {
    if handle.is_null() {
        return;
    }
    guarded("foam_renderer_destroy", (), || {
        drop(unsafe { Box::from_raw(handle) });
    });
}

/// Replaces the mesh.
///
/// `vertices` holds `3 * vertex_count` floats, `indices` holds `index_count`
/// indices (three per triangle), `colors` holds `4 * vertex_count` floats or is
/// null, `cell_colors` holds `4 * cell_count` floats or is null.
///
/// # Safety
/// `handle` is null or live; every non-null array must be readable for the
/// length implied by the counts.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn foam_renderer_update_mesh(
    handle: FoamRendererHandle,
    vertices: *const f32,
    vertex_count: i32,
    indices: *const u32,
    index_count: i32,
    colors: *const f32,
    cell_colors: *const f32,
    cell_count: i32,
) {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return };

    let (Some(position_len), Some(color_len), Some(cell_len)) = (
        scaled_len(vertex_count, POSITION_COMPONENTS),
        scaled_len(vertex_count, COLOR_COMPONENTS),
        scaled_len(cell_count, COLOR_COMPONENTS),
    ) else {
        log::error!(
            "mesh upload ignored: array length overflows ({vertex_count} vertices, {cell_count} cells)"
        );
        return;
    };

    let upload = unsafe {
        MeshUpload {
            positions: slice_or_empty(vertices, position_len),
            indices: slice_or_empty(indices, to_usize(index_count)),
            vertex_colors: (!colors.is_null()).then(|| slice_or_empty(colors, color_len)),
            cell_colors: (!cell_colors.is_null()).then(|| slice_or_empty(cell_colors, cell_len)),
        }
    };

    guarded("foam_renderer_update_mesh", (), || {
        if let Err(err) = renderer.update_mesh(upload) {
            log::error!("mesh upload ignored: {err:#}");
        }
    });
}

/// Sets camera rotation (radians), distance and mesh center.
///
/// # Safety
/// `handle` is null or live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_set_view(
    handle: FoamRendererHandle,
    rotation_x: f32,
    rotation_y: f32,
    zoom: f32,
    center_x: f32,
    center_y: f32,
    center_z: f32,
) {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return };
    renderer.set_view(ViewState::new(
        rotation_x,
        rotation_y,
        zoom,
        Vec3::new(center_x, center_y, center_z),
    ));
}

/// Sets representation (0 wireframe, 1 surface, 2 surface with edges) and
/// data mode (0 cell, 1 point). Out-of-range values are logged and ignored.
///
/// # Safety
/// `handle` is null or live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_set_mode(
    handle: FoamRendererHandle,
    representation: i32,
    data_mode: i32,
) {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return };
    match decode_mode(representation, data_mode) {
        Ok(mode) => renderer.set_mode(mode),
        Err(err) => log::warn!("set_mode ignored: {err:#}"),
    }
}

fn decode_mode(representation: i32, data_mode: i32) -> anyhow::Result<DisplayMode> {
    Ok(DisplayMode::new(
        Representation::try_from(representation)?,
        DataMode::try_from(data_mode)?,
    ))
}

/// Renders a frame and returns the color texture id (0 for a null or
/// non-functional handle).
///
/// # Safety
/// `handle` is null or live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_render(handle: FoamRendererHandle) -> u32 {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return 0 };
    guarded("foam_renderer_render", 0, || renderer.render().get())
}

/// Recreates the render target. Previously returned texture ids become invalid.
///
/// # Safety
/// `handle` is null or live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_resize(handle: FoamRendererHandle, width: i32, height: i32) {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return };
    guarded("foam_renderer_resize", (), || {
        renderer.resize(to_u32(width), to_u32(height));
    });
}

/// Returns the current color texture id without rendering.
///
/// # Safety
/// `handle` is null or live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_get_texture(handle: FoamRendererHandle) -> u32 {
    unsafe { renderer_mut(handle) }.map_or(0, |renderer| renderer.texture_id().get())
}

/// Writes the target size to `width`/`height` (0 for a null or non-functional
/// handle). Either pointer may be null.
///
/// # Safety
/// `handle` is null or live; non-null out pointers must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_get_size(
    handle: FoamRendererHandle,
    width: *mut i32,
    height: *mut i32,
) {
    let (w, h) = unsafe { renderer_mut(handle) }.map_or((0, 0), |renderer| renderer.size());
    unsafe {
        if let Some(out) = width.as_mut() {
            *out = i32::try_from(w).unwrap_or(i32::MAX);
        }
        if let Some(out) = height.as_mut() {
            *out = i32::try_from(h).unwrap_or(i32::MAX);
        }
    }
}

/// Copies the current target into `out` as RGBA8 rows, top row first.
///
/// `len` must be at least `4 * width * height`. Returns 0 on success and -1
/// on a null/non-functional handle, short buffer or GPU failure.
///
/// # Safety
/// `handle` is null or live; `out` must be writable for `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn foam_renderer_read_pixels(
    handle: FoamRendererHandle,
    out: *mut u8,
    len: usize,
) -> i32 {
    let Some(renderer) = (unsafe { renderer_mut(handle) }) else { return -1 };
    if out.is_null() {
        return -1;
    }

    guarded("foam_renderer_read_pixels", -1, || {
        let pixels = match renderer.read_pixels() {
            Ok(pixels) => pixels,
            Err(err) => {
                log::error!("pixel readback failed: {err:#}");
                return -1;
            }
        };
        if pixels.len() > len {
            log::error!("pixel buffer too small: {len} < {}", pixels.len());
            return -1;
        }
        let dst = unsafe { std::slice::from_raw_parts_mut(out, pixels.len()) };
        dst.copy_from_slice(&pixels);
        0
    })
}
