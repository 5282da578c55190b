use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu core objects for offscreen rendering.
///
/// There is no surface: everything renders into textures owned by the caller.
pub struct Gpu {
    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a headless GPU context.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let GpuInit {
            backends,
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let required_limits = device_limits(required_limits, &adapter.limits());
        log::debug!("max buffer size {} bytes", required_limits.max_buffer_size);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("foam-render device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`Gpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Returns information about the selected adapter.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Raises `requested` to what the adapter supports for target sizes and mesh
/// buffers.
fn device_limits(requested: wgpu::Limits, adapter: &wgpu::Limits) -> wgpu::Limits {
    wgpu::Limits {
        max_buffer_size: requested.max_buffer_size.max(adapter.max_buffer_size),
        ..requested.using_resolution(adapter.clone())
    }
}

/// Logs every compilation message the driver reported for `module`.
///
/// Compilation problems never abort: the pipeline is built anyway and draws with
/// it produce whatever the backend yields.
pub fn log_compilation_info(module: &wgpu::ShaderModule, label: &str) {
    let info = pollster::block_on(module.get_compilation_info());
    for msg in &info.messages {
        let line = msg.location.as_ref().map_or(0, |loc| loc.line_number);
        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("shader compilation error ({label}:{line}): {}", msg.message);
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("shader compilation warning ({label}:{line}): {}", msg.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::debug!("shader compilation info ({label}:{line}): {}", msg.message);
            }
        }
    }
}
