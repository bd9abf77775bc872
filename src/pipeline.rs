// ============================================================================
// pipeline.rs — Demo Showcase
// GPU blit pipeline: uploads the CPU canvas into a storage buffer and draws
// it as one quad placed by the viewport uniform. Bind-group-layout helpers.
// ============================================================================

use wgpu::util::DeviceExt;

use crate::canvas::Canvas;
use crate::viewport::{Viewport, ViewportUniforms};

// ======================== Pipeline ========================

/// Render pipeline plus the buffers sized for one canvas resolution.
pub struct BlitPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub pixel_buffer: wgpu::Buffer,
    pub viewport_buffer: wgpu::Buffer,
    pub canvas_size: (u32, u32),
}

// ======================== Pipeline Creation ========================

pub fn create_blit_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    canvas_width: u32,
    canvas_height: u32,
) -> BlitPipeline {
    let shader = load_shader(device, "blit", include_str!("shaders/blit.wgsl"));

    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blit_bgl"),
        entries: &[bgl_uniform(0), bgl_storage_ro(1)],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("blit_pipeline_layout"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blit_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let pixel_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("canvas_pixels"),
        size: pixel_buffer_size(canvas_width, canvas_height),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("viewport_uniforms"),
        contents: bytemuck::bytes_of(&ViewportUniforms::default()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blit_bg"),
        layout: &bgl,
        entries: &[bg_buffer(0, &viewport_buffer), bg_buffer(1, &pixel_buffer)],
    });

    log::info!("Blit pipeline ready for {}x{} canvas", canvas_width, canvas_height);

    BlitPipeline {
        render_pipeline,
        bind_group,
        pixel_buffer,
        viewport_buffer,
        canvas_size: (canvas_width, canvas_height),
    }
}

impl BlitPipeline {
    pub fn fits(&self, canvas: &Canvas) -> bool {
        self.canvas_size == (canvas.width(), canvas.height())
    }

    /// Upload this frame's pixels and quad placement.
    pub fn upload(&self, queue: &wgpu::Queue, canvas: &Canvas, viewport: &Viewport) {
        queue.write_buffer(&self.pixel_buffer, 0, canvas.as_rgba_bytes());
        queue.write_buffer(&self.viewport_buffer, 0, bytemuck::bytes_of(&viewport.uniforms()));
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.render_pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}

fn pixel_buffer_size(width: u32, height: u32) -> u64 {
    (width.max(1) as u64) * (height.max(1) as u64) * 4
}

// ======================== Helpers ========================

fn load_shader(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

fn bgl_uniform(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn bgl_storage_ro(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn bg_buffer(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_buffer_matches_canvas_bytes() {
        let canvas = Canvas::new(600, 400);
        assert_eq!(pixel_buffer_size(600, 400), canvas.as_rgba_bytes().len() as u64);
        assert_eq!(pixel_buffer_size(0, 0), 4);
    }

    #[test]
    fn viewport_uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<ViewportUniforms>(), 32);
    }
}
