// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// GPU-accelerated joint histogram counting for the shift scan.
// This module is compiled only when the `gpu_support` feature is enabled.

#![cfg(feature = "gpu_support")]

use futures_intrusive::channel::shared::oneshot_channel;
use ndarray::Array2;
use pollster::block_on;
use wgpu::util::DeviceExt;

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::config::ShiftRange;
use crate::estimators::traits::Real;

const WORKGROUP_SIZE: u32 = 256;
const MAX_DISPATCH: u32 = 65_535;

/// Wire encoding of an index for the shader; out-of-range becomes `u32::MAX`.
#[inline]
fn encode(index: BinIndex) -> u32 {
    match index {
        BinIndex::Valid(i) => i,
        BinIndex::OutOfRange => u32::MAX,
    }
}

/// Try to count the joint histogram of every shift on the GPU.
///
/// Preconditions for using the GPU path:
/// - the inputs are already validated (equal lengths, shifts inside the series)
/// - the series length and the number of shifts fit into one dispatch
/// - all `shifts * bins_x * bins_y` counters fit into one storage buffer
///
/// Returns one `bins_x x bins_y` table per shift, in shift order. If any condition
/// fails or a GPU error occurs, returns None and callers should fall back to CPU.
pub fn gpu_joint_histograms<T: Real>(
    grid_x: &BinGrid<T>,
    grid_y: &BinGrid<T>,
    indices_x: &[BinIndex],
    indices_y: &[BinIndex],
    shifts: &ShiftRange,
) -> Option<Vec<Array2<u64>>> {
    let n = indices_x.len();
    let shift_count = shifts.len();
    if n == 0 || shift_count == 0 {
        return Some(Vec::new());
    }
    let n_u32 = u32::try_from(n).ok()?;
    let shift_count_u32 = u32::try_from(shift_count).ok()?;
    let wg_count = n_u32.div_ceil(WORKGROUP_SIZE);
    if wg_count > MAX_DISPATCH || shift_count_u32 > MAX_DISPATCH {
        return None;
    }
    let (bins_x, bins_y) = (grid_x.bins(), grid_y.bins());
    let cells = bins_x * bins_y;
    let out_elems = (shift_count as u64) * (cells as u64);
    let out_bytes = out_elems * std::mem::size_of::<u32>() as u64;

    let flat_x: Vec<u32> = indices_x.iter().copied().map(encode).collect();
    let flat_y: Vec<u32> = indices_y.iter().copied().map(encode).collect();

    // Initialize wgpu
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;

    let (device, queue) = block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Joint Histogram Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::default(),
    }))
    .ok()?;

    if out_bytes > device.limits().max_storage_buffer_binding_size as u64 {
        return None;
    }

    // Buffers
    let input_x = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Joint Histogram Input X"),
        contents: bytemuck::cast_slice(&flat_x),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let input_y = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Joint Histogram Input Y"),
        contents: bytemuck::cast_slice(&flat_y),
        usage: wgpu::BufferUsages::STORAGE,
    });

    // Zero-initialized by wgpu: shifts * bins_x * bins_y u32 counters
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Joint Histogram Output Buffer"),
        size: out_bytes,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });

    let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Joint Histogram Staging Buffer"),
        size: out_bytes,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    // Uniforms
    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Config {
        n: u32,
        bins_x: u32,
        bins_y: u32,
        shift_count: u32,
        shift_from: i32,
        shift_step: u32,
        _pad0: u32,
        _pad1: u32,
    }
    let cfg = Config {
        n: n_u32,
        bins_x: bins_x as u32,
        bins_y: bins_y as u32,
        shift_count: shift_count_u32,
        shift_from: i32::try_from(shifts.from).ok()?,
        shift_step: u32::try_from(shifts.step).ok()?,
        _pad0: 0,
        _pad1: 0,
    };
    let config_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Joint Histogram Config Buffer"),
        contents: bytemuck::bytes_of(&cfg),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    // Shader
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Joint Histogram Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("joint_histogram.wgsl").into()),
    });

    let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Joint Histogram BGL"),
        entries: &[
            storage_entry(0, true),
            storage_entry(1, true),
            storage_entry(2, false),
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Joint Histogram Pipeline Layout"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Joint Histogram Pipeline"),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Joint Histogram BG"),
        layout: &bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: input_x.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input_y.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: config_buffer.as_entire_binding(),
            },
        ],
    });

    // Dispatch: x over samples, y over shifts
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Joint Histogram Encoder"),
    });
    {
        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Joint Histogram Compute Pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(&pipeline);
        cpass.set_bind_group(0, &bind_group, &[]);
        cpass.dispatch_workgroups(wg_count, shift_count_u32, 1);
    }

    encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, out_bytes);
    queue.submit(std::iter::once(encoder.finish()));

    // Read back
    let slice = staging_buffer.slice(..);
    let (sender, receiver) = oneshot_channel();
    slice.map_async(wgpu::MapMode::Read, move |v| {
        sender.send(v).ok();
    });
    device.poll(wgpu::PollType::Wait).ok()?;
    match block_on(receiver.receive()) {
        Some(Ok(())) => {}
        _ => return None,
    }
    let view = slice.get_mapped_range();
    let counts_u32: Vec<u32> = bytemuck::cast_slice(&view).to_vec();
    drop(view);
    staging_buffer.unmap();

    counts_u32
        .chunks_exact(cells)
        .map(|table| {
            Array2::from_shape_vec(
                (bins_x, bins_y),
                table.iter().map(|&c| u64::from(c)).collect(),
            )
            .ok()
        })
        .collect()
}
