//! GPU adapter and device acquisition.

use log::{debug, info};

use crate::error::{MatrixError, Result};

/// An adapter with its device and queue.
#[derive(Debug)]
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    timestamps: bool,
}

impl GpuContext {
    /// Acquire a high-performance adapter and open a device on it.
    ///
    /// `TIMESTAMP_QUERY` is requested whenever the adapter offers it so that
    /// dispatches can be timed on the device. Limits are the adapter's own,
    /// so buffer sizes are bounded by the hardware rather than by the
    /// portable defaults.
    pub fn new() -> Result<Self> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&adapter_options())
            .await
            .ok_or(MatrixError::NoAdapter)?;

        let timestamps = adapter.features().contains(wgpu::Features::TIMESTAMP_QUERY);
        let required_features = if timestamps {
            wgpu::Features::TIMESTAMP_QUERY
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("gpu-matrix device"),
                    required_features,
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| MatrixError::Gpu(format!("failed to create device: {}", e)))?;

        let ctx = GpuContext {
            adapter,
            device,
            queue,
            timestamps,
        };
        info!("using GPU adapter {}", ctx.adapter_info());
        debug!("device timestamp queries: {}", ctx.timestamps);
        Ok(ctx)
    }

    /// Check if any GPU adapter is present.
    pub fn is_available() -> bool {
        pollster::block_on(async {
            wgpu::Instance::default()
                .request_adapter(&adapter_options())
                .await
                .is_some()
        })
    }

    /// Adapter name and graphics API, e.g. `NVIDIA GeForce RTX 3060 (Vulkan)`.
    pub fn adapter_info(&self) -> String {
        let info = self.adapter.get_info();
        format!("{} ({:?})", info.name, info.backend)
    }

    /// Whether the device was opened with timestamp queries.
    pub fn supports_timestamps(&self) -> bool {
        self.timestamps
    }
}

fn adapter_options() -> wgpu::RequestAdapterOptions<'static, 'static> {
    wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }
}
