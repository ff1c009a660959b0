//! wgpu compute backend.
//!
//! Kernels are built once from embedded WGSL when the backend is created.
//! Each call uploads its operands, dispatches one work-item per output
//! element and blocks until the result has been read back.

pub mod context;
pub mod kernels;

use log::debug;
use wgpu::util::DeviceExt;

use crate::backend::{check_len, ComputeBackend, ElementwiseOp, KernelRun};
use crate::error::{MatrixError, Result};
use crate::shape::Shape;
use crate::timing::{HostClock, KernelTiming, TimingSource};

pub use context::GpuContext;

/// Host mirror of the `Dims` uniform in [`kernels::MATRIX_KERNELS`].
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Dims {
    rows: u32,
    cols: u32,
    inner: u32,
    _padding: u32,
}

impl Dims {
    fn new(rows: usize, cols: usize, inner: usize) -> Result<Self> {
        Ok(Dims {
            rows: to_u32(rows, "rows")?,
            cols: to_u32(cols, "cols")?,
            inner: to_u32(inner, "inner")?,
            _padding: 0,
        })
    }

    fn numel(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

fn to_u32(v: usize, what: &str) -> Result<u32> {
    u32::try_from(v).map_err(|_| MatrixError::Gpu(format!("{} = {} does not fit in u32", what, v)))
}

/// Compute backend that runs the matrix kernels through wgpu.
#[derive(Debug)]
pub struct WgpuBackend {
    ctx: GpuContext,
    add_pipeline: wgpu::ComputePipeline,
    sub_pipeline: wgpu::ComputePipeline,
    matmul_pipeline: wgpu::ComputePipeline,
    clock: HostClock,
}

impl WgpuBackend {
    /// Open the default GPU and build the kernels.
    pub fn new() -> Result<Self> {
        Self::with_context(GpuContext::new()?)
    }

    /// Build the kernels on an already opened context.
    ///
    /// Shader compilation and pipeline validation errors are captured and
    /// returned as `KernelBuild` instead of reaching the device's uncaptured
    /// error handler.
    pub fn with_context(ctx: GpuContext) -> Result<Self> {
        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("matrix kernels"),
                source: wgpu::ShaderSource::Wgsl(kernels::MATRIX_KERNELS.into()),
            });
        let add_pipeline =
            build_pipeline(&ctx.device, &module, ElementwiseOp::Add.kernel_name());
        let sub_pipeline =
            build_pipeline(&ctx.device, &module, ElementwiseOp::Sub.kernel_name());
        let matmul_pipeline = build_pipeline(&ctx.device, &module, kernels::MATMUL_ENTRY);

        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(MatrixError::KernelBuild(err.to_string()));
        }
        debug!("built matrix kernels on {}", ctx.adapter_info());

        Ok(WgpuBackend {
            ctx,
            add_pipeline,
            sub_pipeline,
            matmul_pipeline,
            clock: HostClock::new(),
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    fn dispatch(
        &self,
        pipeline: &wgpu::ComputePipeline,
        label: &str,
        a: &[i32],
        b: &[i32],
        dims: Dims,
    ) -> Result<KernelRun> {
        let out_len = dims.numel();
        if out_len == 0 {
            let now = self.clock.now_ns();
            return Ok(KernelRun {
                values: Vec::new(),
                timing: KernelTiming::new(now, now, TimingSource::Host),
            });
        }

        let groups_x = kernels::workgroup_count(dims.rows);
        let groups_y = kernels::workgroup_count(dims.cols);
        let max_groups = self.ctx.device.limits().max_compute_workgroups_per_dimension;
        if groups_x > max_groups || groups_y > max_groups {
            return Err(MatrixError::Gpu(format!(
                "{}x{} workgroups exceeds the device limit of {} per dimension",
                groups_x, groups_y, max_groups
            )));
        }
        let largest = [a.len(), b.len(), out_len]
            .into_iter()
            .max()
            .unwrap_or(0)
            .saturating_mul(std::mem::size_of::<i32>()) as u64;
        check_buffer_size(largest, &self.ctx.device.limits())?;

        debug!(
            "{}: {}x{} grid in {}x{} workgroups",
            label, dims.rows, dims.cols, groups_x, groups_y
        );

        pollster::block_on(self.dispatch_async(pipeline, label, a, b, dims, groups_x, groups_y))
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch_async(
        &self,
        pipeline: &wgpu::ComputePipeline,
        label: &str,
        a: &[i32],
        b: &[i32],
        dims: Dims,
        groups_x: u32,
        groups_y: u32,
    ) -> Result<KernelRun> {
        let device = &self.ctx.device;
        let out_size = (dims.numel() * std::mem::size_of::<i32>()) as u64;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        // Storage bindings cannot be empty; a zero inner dimension still
        // binds one element that the kernel never reads.
        let a_buffer = self.input_buffer("Matrix A", a);
        let b_buffer = self.input_buffer("Matrix B", b);
        let dims_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Dimensions"),
            contents: bytemuck::bytes_of(&dims),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let c_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Matrix C"),
            size: out_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer"),
            size: out_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: a_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: b_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: c_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: dims_buffer.as_entire_binding(),
                },
            ],
        });

        let queries = if self.ctx.supports_timestamps() {
            Some(TimestampQueries::new(device))
        } else {
            None
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(label),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: queries.as_ref().map(TimestampQueries::pass_writes),
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&c_buffer, 0, &staging_buffer, 0, out_size);
        if let Some(q) = &queries {
            q.resolve(&mut encoder);
        }

        let host_start = self.clock.now_ns();
        self.ctx.queue.submit(Some(encoder.finish()));

        let run = self
            .collect(&staging_buffer, queries.as_ref(), host_start)
            .await;

        // The scope must be popped even when readback failed.
        if let Some(err) = device.pop_error_scope().await {
            return Err(MatrixError::Gpu(err.to_string()));
        }
        run
    }

    async fn collect(
        &self,
        staging: &wgpu::Buffer,
        queries: Option<&TimestampQueries>,
        host_start: u64,
    ) -> Result<KernelRun> {
        let values: Vec<i32> = self.read_back(staging).await?;
        let timing = match queries {
            Some(q) => {
                let ticks: Vec<u64> = self.read_back(&q.readback).await?;
                let period = self.ctx.queue.get_timestamp_period() as f64;
                KernelTiming::new(
                    (ticks[0] as f64 * period) as u64,
                    (ticks[1] as f64 * period) as u64,
                    TimingSource::Device,
                )
            }
            None => KernelTiming::new(host_start, self.clock.now_ns(), TimingSource::Host),
        };
        Ok(KernelRun { values, timing })
    }

    fn input_buffer(&self, label: &str, data: &[i32]) -> wgpu::Buffer {
        let data = if data.is_empty() { &[0i32][..] } else { data };
        self.ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::STORAGE,
            })
    }

    /// Map a `MAP_READ` buffer, block until the GPU is done with it, and copy
    /// its contents out.
    async fn read_back<T: bytemuck::Pod>(&self, buffer: &wgpu::Buffer) -> Result<Vec<T>> {
        let slice = buffer.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        self.ctx.device.poll(wgpu::Maintain::Wait);

        receiver
            .receive()
            .await
            .ok_or_else(|| MatrixError::Gpu("buffer mapping callback was dropped".to_string()))?
            .map_err(|e| MatrixError::Gpu(format!("buffer mapping failed: {}", e)))?;

        let values = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice(&view).to_vec()
        };
        buffer.unmap();
        Ok(values)
    }
}

impl ComputeBackend for WgpuBackend {
    fn name(&self) -> &str {
        "wgpu"
    }

    fn elementwise(
        &self,
        op: ElementwiseOp,
        a: &[i32],
        b: &[i32],
        shape: Shape,
    ) -> Result<KernelRun> {
        check_len(a, shape.numel())?;
        check_len(b, shape.numel())?;

        let pipeline = match op {
            ElementwiseOp::Add => &self.add_pipeline,
            ElementwiseOp::Sub => &self.sub_pipeline,
        };
        let dims = Dims::new(shape.rows(), shape.cols(), 0)?;
        self.dispatch(pipeline, op.kernel_name(), a, b, dims)
    }

    fn matmul(&self, a: &[i32], b: &[i32], m: usize, k: usize, n: usize) -> Result<KernelRun> {
        check_len(a, m * k)?;
        check_len(b, k * n)?;

        let dims = Dims::new(m, n, k)?;
        self.dispatch(&self.matmul_pipeline, kernels::MATMUL_ENTRY, a, b, dims)
    }
}

/// Rejects a storage buffer of `bytes` that the device could not bind.
fn check_buffer_size(bytes: u64, limits: &wgpu::Limits) -> Result<()> {
    let max = limits
        .max_buffer_size
        .min(limits.max_storage_buffer_binding_size as u64);
    if bytes > max {
        return Err(MatrixError::Gpu(format!(
            "{} byte buffer exceeds the device's {} byte storage binding limit",
            bytes, max
        )));
    }
    Ok(())
}

fn build_pipeline(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(entry_point),
        layout: None,
        module,
        entry_point,
        compilation_options: Default::default(),
        cache: None,
    })
}

/// Two timestamps bracketing one compute pass, plus the buffers needed to
/// resolve them and read them back.
struct TimestampQueries {
    set: wgpu::QuerySet,
    resolve: wgpu::Buffer,
    readback: wgpu::Buffer,
}

impl TimestampQueries {
    const COUNT: u32 = 2;
    const SIZE: u64 = Self::COUNT as u64 * wgpu::QUERY_SIZE as u64;

    fn new(device: &wgpu::Device) -> Self {
        let set = device.create_query_set(&wgpu::QuerySetDescriptor {
            label: Some("Kernel Timestamps"),
            ty: wgpu::QueryType::Timestamp,
            count: Self::COUNT,
        });
        let resolve = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Timestamp Resolve"),
            size: Self::SIZE,
            usage: wgpu::BufferUsages::QUERY_RESOLVE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Timestamp Readback"),
            size: Self::SIZE,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        TimestampQueries {
            set,
            resolve,
            readback,
        }
    }

    fn pass_writes(&self) -> wgpu::ComputePassTimestampWrites<'_> {
        wgpu::ComputePassTimestampWrites {
            query_set: &self.set,
            beginning_of_pass_write_index: Some(0),
            end_of_pass_write_index: Some(1),
        }
    }

    fn resolve(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.resolve_query_set(&self.set, 0..Self::COUNT, &self.resolve, 0);
        encoder.copy_buffer_to_buffer(&self.resolve, 0, &self.readback, 0, Self::SIZE);
    }
}
