//! Overlay surface and the redraw-driven frame loop.
//!
//! [`GpuState`] owns the wgpu surface and the two render pipelines per
//! blend mode; [`TrailApp`] is the winit application that wires pointer
//! events into the simulation and drives one tick-then-render step per
//! redraw, re-requesting a redraw each time so the loop runs at the
//! display's native cadence rather than a fixed timer.
//!
//! Lifecycle: **Idle** (constructed, or a touch/small-viewport device, in
//! which case nothing is ever created) -> **Running** (surface up, one
//! redraw in flight at a time) -> **Stopped** (surface and window dropped;
//! reaching it twice is a no-op).

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::TrailConfig;
use crate::error::{GpuError, TrailError};
use crate::render::FrameGeometry;
use crate::shader::{BlobInstance, LineVertex, Uniforms, BLOB_SHADER, LINE_SHADER};
use crate::simulation::TrailSimulation;
use crate::time::FrameClock;
use crate::visuals::{BlendMode, Theme};
use crate::DeviceClass;

/// GPU resources for the transparent overlay.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    blob_pipeline_alpha: wgpu::RenderPipeline,
    blob_pipeline_additive: wgpu::RenderPipeline,
    line_pipeline_alpha: wgpu::RenderPipeline,
    line_pipeline_additive: wgpu::RenderPipeline,
    blob_buffer: wgpu::Buffer,
    line_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    max_blobs: usize,
    max_line_vertices: usize,
}

impl GpuState {
    /// Acquire the surface and build both pipeline pairs.
    ///
    /// `capacity` is the particle cap; buffers are sized once for the worst
    /// case (capacity blobs, capacity*(capacity-1) line vertices) and
    /// written partially each frame.
    pub async fn new(window: Arc<Window>, capacity: usize) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // A transparent overlay wants premultiplied compositing when the
        // platform offers it.
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps.alpha_modes[0]
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_blobs = capacity;
        let max_line_vertices = capacity.saturating_mul(capacity.saturating_sub(1));

        let blob_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Blob Instance Buffer"),
            size: (max_blobs * std::mem::size_of::<BlobInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Vertex Buffer"),
            size: (max_line_vertices * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trail Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blob_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blob Shader"),
            source: wgpu::ShaderSource::Wgsl(BLOB_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER.into()),
        });

        let blob_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlobInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        };

        let line_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        };

        let make_pipeline = |label: &str,
                             shader: &wgpu::ShaderModule,
                             layout: wgpu::VertexBufferLayout,
                             topology: wgpu::PrimitiveTopology,
                             blend: BlendMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(blend.to_wgpu()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let blob_pipeline_alpha = make_pipeline(
            "Blob Pipeline (alpha)",
            &blob_shader,
            blob_layout.clone(),
            wgpu::PrimitiveTopology::TriangleList,
            BlendMode::Alpha,
        );
        let blob_pipeline_additive = make_pipeline(
            "Blob Pipeline (additive)",
            &blob_shader,
            blob_layout,
            wgpu::PrimitiveTopology::TriangleList,
            BlendMode::Additive,
        );
        let line_pipeline_alpha = make_pipeline(
            "Line Pipeline (alpha)",
            &line_shader,
            line_layout.clone(),
            wgpu::PrimitiveTopology::LineList,
            BlendMode::Alpha,
        );
        let line_pipeline_additive = make_pipeline(
            "Line Pipeline (additive)",
            &line_shader,
            line_layout,
            wgpu::PrimitiveTopology::LineList,
            BlendMode::Additive,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            blob_pipeline_alpha,
            blob_pipeline_additive,
            line_pipeline_alpha,
            line_pipeline_additive,
            blob_buffer,
            line_buffer,
            uniform_buffer,
            uniform_bind_group,
            max_blobs,
            max_line_vertices,
        })
    }

    /// Reconfigure the surface for a new viewport size; prior content is lost.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one frame: clear to transparent and repaint everything.
    ///
    /// The theme is consulted here and nowhere else: it picks the gradient
    /// ramp, the line color, and the compositing mode.
    pub fn render(
        &mut self,
        geometry: &FrameGeometry,
        trail: &TrailConfig,
        theme: Theme,
    ) -> Result<(), wgpu::SurfaceError> {
        let palette = &trail.palette;
        // The connective mesh's base opacity rides on the line color; the
        // per-pair distance/life falloff is baked into each vertex.
        let mut line_color = palette.line_color(theme);
        if let Some(style) = &trail.connections {
            line_color[3] *= style.alpha;
        }
        let uniforms = Uniforms {
            resolution: [self.config.width as f32, self.config.height as f32],
            _pad: [0.0; 2],
            stops: palette.stops(theme).0,
            line_color,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let blob_count = geometry.blobs.len().min(self.max_blobs);
        if blob_count > 0 {
            self.queue.write_buffer(
                &self.blob_buffer,
                0,
                bytemuck::cast_slice(&geometry.blobs[..blob_count]),
            );
        }
        let line_count = geometry.lines.len().min(self.max_line_vertices);
        if line_count > 0 {
            self.queue.write_buffer(
                &self.line_buffer,
                0,
                bytemuck::cast_slice(&geometry.lines[..line_count]),
            );
        }

        let blend = BlendMode::for_theme(theme);
        let (blob_pipeline, line_pipeline) = match blend {
            BlendMode::Alpha => (&self.blob_pipeline_alpha, &self.line_pipeline_alpha),
            BlendMode::Additive => (&self.blob_pipeline_additive, &self.line_pipeline_additive),
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Trail Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Trail Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if blob_count > 0 {
                render_pass.set_pipeline(blob_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.blob_buffer.slice(..));
                render_pass.draw(0..6, 0..blob_count as u32);
            }

            if line_count > 0 {
                render_pass.set_pipeline(line_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..line_count as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Lifecycle state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing created yet, or a device the trail never runs on.
    Idle,
    /// Surface up, one redraw scheduled at a time.
    Running,
    /// Torn down; surface and window released.
    Stopped,
}

/// The winit application driving one trail simulation.
pub struct TrailApp {
    sim: TrailSimulation,
    clock: FrameClock,
    geometry: FrameGeometry,
    theme: Theme,
    device_class: DeviceClass,
    phase: Phase,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
}

impl TrailApp {
    /// Create an app in the Idle state.
    pub fn new(config: TrailConfig, theme: Theme, device_class: DeviceClass) -> Self {
        Self {
            sim: TrailSimulation::new(config),
            clock: FrameClock::new(),
            geometry: FrameGeometry::default(),
            theme,
            device_class,
            phase: Phase::Idle,
            window: None,
            gpu: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Swap the theme signal; takes effect on the next frame.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Whether `resumed` would bring the overlay up.
    ///
    /// False on touch/small-viewport devices: the trail then never creates
    /// a surface, attaches no listeners, and schedules no frames.
    pub fn should_activate(&self) -> bool {
        self.phase == Phase::Idle && self.device_class.supports_trail()
    }

    /// Tear down the overlay. Safe to call any number of times.
    pub fn shutdown(&mut self) {
        self.gpu = None;
        self.window = None;
        self.phase = Phase::Stopped;
    }

    /// Borrow the simulation (pointer feeding, inspection).
    pub fn simulation_mut(&mut self) -> &mut TrailSimulation {
        &mut self.sim
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != Phase::Running {
            return;
        }
        self.clock.update();
        self.sim.tick();
        let visibility = self.sim.visibility();
        self.geometry
            .rebuild(self.sim.particles(), self.sim.config(), visibility);

        let mut out_of_memory = false;
        if let Some(gpu) = &mut self.gpu {
            match gpu.render(&self.geometry, self.sim.config(), self.theme) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                }),
                Err(wgpu::SurfaceError::OutOfMemory) => out_of_memory = true,
                Err(e) => eprintln!("Render error: {:?}", e),
            }
        }
        if out_of_memory {
            self.shutdown();
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            if self.clock.frame() % 30 == 0 {
                window.set_title(&format!("wisp ({:.0} fps)", self.clock.fps()));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for TrailApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.should_activate() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("wisp")
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                eprintln!("Trail disabled, window creation failed: {}", e);
                self.shutdown();
                return;
            }
        };

        let capacity = self.sim.config().capacity;
        match pollster::block_on(GpuState::new(window.clone(), capacity)) {
            Ok(gpu) => {
                self.window = Some(window);
                self.gpu = Some(gpu);
                self.phase = Phase::Running;
            }
            Err(e) => {
                // Fatal to this feature only; the host keeps running.
                eprintln!("Trail disabled, no drawing surface: {}", e);
                self.shutdown();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.sim.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.sim.pointer_left();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Run a trail overlay until its window closes.
///
/// On a touch/small-viewport device this returns immediately without
/// creating anything.
pub fn run(config: TrailConfig, theme: Theme, device_class: DeviceClass) -> Result<(), TrailError> {
    if !device_class.supports_trail() {
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = TrailApp::new(config, theme, device_class);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_device_stays_idle() {
        let app = TrailApp::new(TrailConfig::fluid(), Theme::Dark, DeviceClass::TouchOrSmall);
        assert_eq!(app.phase(), Phase::Idle);
        assert!(!app.should_activate());
        assert!(app.window.is_none());
        assert!(app.gpu.is_none());
    }

    #[test]
    fn test_desktop_device_would_activate() {
        let app = TrailApp::new(TrailConfig::fluid(), Theme::Dark, DeviceClass::Desktop);
        assert_eq!(app.phase(), Phase::Idle);
        assert!(app.should_activate());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut app = TrailApp::new(TrailConfig::fluid(), Theme::Dark, DeviceClass::Desktop);
        app.shutdown();
        assert_eq!(app.phase(), Phase::Stopped);
        app.shutdown();
        assert_eq!(app.phase(), Phase::Stopped);
        assert!(app.window.is_none());
        assert!(app.gpu.is_none());
        // Stopped never re-activates.
        assert!(!app.should_activate());
    }
}
