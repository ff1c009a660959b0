//! WGSL source for the matrix kernels.
//!
//! Every entry point runs on a 16x16 workgroup and maps
//! `global_invocation_id.xy` to `(row, col)` of the output, so one work-item
//! writes exactly one element. Work-items that land in the padding of the
//! last workgroup return early.

/// Workgroup edge length shared by all kernels.
pub const WORKGROUP_SIZE: u32 = 16;

/// Dimensions uniform, mirrored by `Dims` on the host.
///
/// - elementwise: `rows x cols` for all three buffers, `inner` unused
/// - matmul: A is `rows x inner`, B is `inner x cols`, C is `rows x cols`
pub const MATRIX_KERNELS: &str = r#"
struct Dims {
    rows: u32,
    cols: u32,
    inner: u32,
    padding: u32,
}

@group(0) @binding(0) var<storage, read> a: array<i32>;
@group(0) @binding(1) var<storage, read> b: array<i32>;
@group(0) @binding(2) var<storage, read_write> c: array<i32>;
@group(0) @binding(3) var<uniform> dims: Dims;

@compute @workgroup_size(16, 16)
fn matrix_addition(@builtin(global_invocation_id) gid: vec3<u32>) {
    let row = gid.x;
    let col = gid.y;
    if (row >= dims.rows || col >= dims.cols) {
        return;
    }
    let idx = row * dims.cols + col;
    c[idx] = a[idx] + b[idx];
}

@compute @workgroup_size(16, 16)
fn matrix_subtraction(@builtin(global_invocation_id) gid: vec3<u32>) {
    let row = gid.x;
    let col = gid.y;
    if (row >= dims.rows || col >= dims.cols) {
        return;
    }
    let idx = row * dims.cols + col;
    c[idx] = a[idx] - b[idx];
}

@compute @workgroup_size(16, 16)
fn matrix_multiply(@builtin(global_invocation_id) gid: vec3<u32>) {
    let row = gid.x;
    let col = gid.y;
    if (row >= dims.rows || col >= dims.cols) {
        return;
    }

    var sum: i32 = 0;
    for (var i: u32 = 0u; i < dims.inner; i = i + 1u) {
        sum = sum + a[row * dims.inner + i] * b[i * dims.cols + col];
    }
    c[row * dims.cols + col] = sum;
}
"#;

/// Entry point of the matrix product kernel.
pub const MATMUL_ENTRY: &str = "matrix_multiply";

/// Number of workgroups needed to cover `extent` work-items along one axis.
pub fn workgroup_count(extent: u32) -> u32 {
    extent.div_ceil(WORKGROUP_SIZE)
}
