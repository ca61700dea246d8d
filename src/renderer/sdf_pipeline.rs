//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.
//! The logical playfield is letterboxed into whatever size the canvas has.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::GameState;
use crate::{colors, unpack_rgb};

/// Spacing of the background grid in logical pixels
pub const GRID_SPACING: f32 = 40.0;
/// Paddle corner radius
pub const PADDLE_CORNER_RADIUS: f32 = 4.0;
/// Glow spread around the paddle
pub const PADDLE_GLOW: f32 = 10.0;
/// Glow spread around the ball
pub const BALL_GLOW: f32 = 15.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0
    pub playfield: [f32; 2],  // offset 8
    pub scale: f32,           // offset 16
    pub grid_spacing: f32,    // offset 20 (0 disables the grid)
    pub offset: [f32; 2],     // offset 24
    pub background: [f32; 4], // offset 32
    pub grid_color: [f32; 4], // offset 48
    pub glow: f32,            // offset 64 (0 or 1)
    _pad: [f32; 3],           // pad to 80 bytes
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PaddleUniform {
    /// x, y, width, height in logical pixels
    pub rect: [f32; 4],
    pub color: [f32; 4],
    pub corner_radius: f32,
    pub glow: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BallUniform {
    pub center: [f32; 2],
    pub radius: f32,
    pub glow: f32,
    pub color: [f32; 4],
}

/// Convert one sRGB channel to linear (the surface format is sRGB)
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed sRGB hex to a linear RGBA color
pub fn linear_rgba(hex: u32) -> [f32; 4] {
    let [r, g, b] = unpack_rgb(hex);
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0]
}

/// Uniform scale and offset that fit the playfield inside the surface
///
/// Aspect ratio is preserved; the spare space is split evenly on both sides.
pub fn letterbox(width: u32, height: u32) -> (f32, [f32; 2]) {
    let (w, h) = (width as f32, height as f32);
    let scale = (w / GAME_WIDTH).min(h / GAME_HEIGHT);
    let offset = [
        (w - GAME_WIDTH * scale) / 2.0,
        (h - GAME_HEIGHT * scale) / 2.0,
    ];
    (scale, offset)
}

/// Everything the shader needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneUniforms {
    pub globals: Globals,
    pub paddle: PaddleUniform,
    pub ball: BallUniform,
}

impl SceneUniforms {
    /// Snapshot the game state for drawing. Reads only.
    pub fn from_state(state: &GameState, settings: &Settings, size: (u32, u32)) -> Self {
        let (scale, offset) = letterbox(size.0, size.1);
        let glow = if settings.effective_glow() { 1.0 } else { 0.0 };

        let globals = Globals {
            resolution: [size.0 as f32, size.1 as f32],
            playfield: [GAME_WIDTH, GAME_HEIGHT],
            scale,
            grid_spacing: if settings.grid { GRID_SPACING } else { 0.0 },
            offset,
            background: linear_rgba(colors::BACKGROUND),
            grid_color: linear_rgba(colors::GRID),
            glow,
            _pad: [0.0; 3],
        };

        let p = &state.paddle;
        let paddle = PaddleUniform {
            rect: [p.x, p.y, p.width, p.height],
            color: linear_rgba(p.color),
            corner_radius: PADDLE_CORNER_RADIUS,
            glow: PADDLE_GLOW * glow,
            _pad: [0.0; 2],
        };

        let b = &state.ball;
        let ball = BallUniform {
            center: [b.pos.x, b.pos.y],
            radius: b.radius,
            glow: BALL_GLOW * glow,
            color: linear_rgba(b.color),
        };

        Self {
            globals,
            paddle,
            ball,
        }
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    paddle_buffer: wgpu::Buffer,
    ball_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let initial = SceneUniforms::from_state(
            &GameState::new(0),
            &Settings::default(),
            (width, height),
        );

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&initial.globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let paddle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("paddle"),
            contents: bytemuck::bytes_of(&initial.paddle),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ball_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ball"),
            contents: bytemuck::bytes_of(&initial.ball),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1), uniform_entry(2)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: paddle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ball_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
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
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            paddle_buffer,
            ball_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
    ) -> Result<(), wgpu::SurfaceError> {
        let scene = SceneUniforms::from_state(state, settings, self.size);

        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&scene.globals));
        self.queue
            .write_buffer(&self.paddle_buffer, 0, bytemuck::bytes_of(&scene.paddle));
        self.queue
            .write_buffer(&self.ball_buffer, 0, bytemuck::bytes_of(&scene.ball));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 80);
        assert_eq!(std::mem::size_of::<PaddleUniform>(), 48);
        assert_eq!(std::mem::size_of::<BallUniform>(), 32);
    }

    #[test]
    fn test_letterbox_exact_fit() {
        let (scale, offset) = letterbox(800, 600);
        assert_eq!(scale, 1.0);
        assert_eq!(offset, [0.0, 0.0]);
    }

    #[test]
    fn test_letterbox_wide_surface_pillarboxes() {
        let (scale, offset) = letterbox(1600, 600);
        assert_eq!(scale, 1.0);
        assert_eq!(offset, [400.0, 0.0]);

        let (scale, offset) = letterbox(400, 600);
        assert_eq!(scale, 0.5);
        assert_eq!(offset, [0.0, 150.0]);
    }

    #[test]
    fn test_color_conversion_endpoints() {
        assert_eq!(linear_rgba(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let white = linear_rgba(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-5));
        // Mid grey is darker in linear space
        assert!(linear_rgba(0x808080)[0] < 0.25);
    }

    #[test]
    fn test_scene_reads_state() {
        let mut state = GameState::new(0);
        state.reset_for_play();
        state.paddle.x = 100.0;
        let scene = SceneUniforms::from_state(&state, &Settings::default(), (800, 600));

        assert_eq!(scene.paddle.rect, [100.0, 560.0, 120.0, 12.0]);
        assert_eq!(scene.ball.center, [400.0, 200.0]);
        assert_eq!(scene.ball.radius, BALL_RADIUS);
        assert_eq!(scene.ball.glow, BALL_GLOW);
        assert_eq!(scene.globals.grid_spacing, GRID_SPACING);
    }

    #[test]
    fn test_scene_honors_visual_settings() {
        let state = GameState::new(0);
        let settings = Settings {
            grid: false,
            reduced_motion: true,
            ..Default::default()
        };
        let scene = SceneUniforms::from_state(&state, &settings, (800, 600));
        assert_eq!(scene.globals.grid_spacing, 0.0);
        assert_eq!(scene.globals.glow, 0.0);
        assert_eq!(scene.paddle.glow, 0.0);
        assert_eq!(scene.ball.glow, 0.0);
    }
}
