use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use emdr_core::{
    apply_command, command_for_key, hex_to_rgb, BallController, BallFrame, BallRenderer,
    ControlPanel, DeadlineTimer, FileStore, Settings, SoundCue, TONE_ATTACK_SEC,
    TONE_DURATION_SEC, TONE_FREQUENCY_HZ, TONE_GAIN,
};
use glam::Vec2;

const SETTINGS_ENV: &str = "EMDR_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "emdr-defaults.json";
const WINDOW_TITLE: &str = "EMDR Ball";
const WINDOW_MARGIN: u32 = 80;
const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    center: [f32; 2],
    half_size: [f32; 2],
    color: [f32; 4],
    shape: f32, // 0 = rect, 1 = circle
}

/// What the renderer draws, in box-local pixels.
#[derive(Clone, Debug, Default)]
struct Scene {
    box_size: f32,
    box_color: [f32; 3],
    ball_color: [f32; 3],
    center: Vec2,
    radius: f32,
    ball_visible: bool,
}

fn color_or(hex: &str, fallback: [f32; 3]) -> [f32; 3] {
    hex_to_rgb(hex).unwrap_or_else(|| {
        log::warn!("[settings] unsupported color '{hex}'");
        fallback
    })
}

/// Feeds the controller's frames into the shared [`Scene`].
struct SceneRenderer {
    scene: Rc<RefCell<Scene>>,
}

impl BallRenderer for SceneRenderer {
    fn configure(&mut self, settings: &Settings, _half_cycle_secs: Option<f64>) {
        let mut scene = self.scene.borrow_mut();
        scene.box_size = settings.box_size.max(0) as f32;
        scene.box_color = color_or(&settings.bg_color, [1.0, 1.0, 1.0]);
        scene.ball_color = color_or(&settings.ball_color, [1.0, 0.34, 0.13]);
        scene.radius = settings.ball_radius() as f32;
    }

    fn draw(&mut self, frame: &BallFrame<'_>) {
        let mut scene = self.scene.borrow_mut();
        scene.box_size = frame.box_size;
        scene.center = frame.center;
        scene.radius = frame.radius;
    }

    fn set_visible(&mut self, visible: bool) {
        self.scene.borrow_mut().ball_visible = visible;
    }
}

impl Scene {
    fn instances(&self, width: f32, height: f32) -> Vec<InstanceData> {
        let side = self.box_size;
        let origin = Vec2::new((width - side) * 0.5, (height - side) * 0.5);
        let mut out = Vec::with_capacity(2);
        out.push(InstanceData {
            center: (origin + Vec2::splat(side * 0.5)).to_array(),
            half_size: [side * 0.5, side * 0.5],
            color: [self.box_color[0], self.box_color[1], self.box_color[2], 1.0],
            shape: 0.0,
        });
        if self.ball_visible && self.radius > 0.0 {
            out.push(InstanceData {
                center: (origin + self.center).to_array(),
                half_size: [self.radius, self.radius],
                color: [self.ball_color[0], self.ball_color[1], self.ball_color[2], 1.0],
                shape: 1.0,
            });
        }
        out
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        // Colors come straight from hex values, so prefer a non-sRGB target
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface has no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ball"),
            source: wgpu::ShaderSource::Wgsl(emdr_core::BALL_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Unit quad corners in -1..1, two triangles
        let quad_vertices: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<InstanceData>() * 2) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: box and ball instances
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 8,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 32,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            bind_group,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let (width, height) = (self.config.width as f32, self.config.height as f32);
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                viewport: [width, height],
                _pad: [0.0; 2],
            }),
        );
        let instances = scene.instances(width, height);
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..instances.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn panel_title(controller: &BallController) -> String {
    let s = controller.settings();
    let mut title = format!(
        "{WINDOW_TITLE}: box {}px, ball {}px, {}px/s, sound {}",
        s.box_size,
        s.ball_size,
        s.ball_speed,
        if s.sound_enabled { "on" } else { "off" }
    );
    if controller.is_paused() {
        title.push_str(" [paused]");
    }
    if !controller.is_ball_visible() {
        title.push_str(" [ball hidden]");
    }
    title
}

/// Name a winit key the way `KeyboardEvent.key` would.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::Space) => Some(" "),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft"),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight"),
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        Key::Character(c) => Some(c.as_str()),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings_path =
        std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
    let mut store = FileStore::new(settings_path);
    log::info!("[settings] using {}", store.path().display());

    let scene = Rc::new(RefCell::new(Scene {
        ball_visible: true,
        ..Scene::default()
    }));
    let renderer = Box::new(SceneRenderer {
        scene: Rc::clone(&scene),
    });
    let mut controller =
        BallController::simulated(Settings::default(), renderer, Box::new(ToneSound::start()));
    controller.load(&store);

    let idle = DeadlineTimer::new();
    let mut panel = ControlPanel::new(Box::new(idle.clone()));

    let event_loop = EventLoop::new()?;
    let side = controller.settings().box_size.max(0) as u32 + WINDOW_MARGIN;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(side.max(640), side.max(480)))
        .build(&event_loop)?;
    let max_box = window
        .current_monitor()
        .map(|m| m.size().width.min(i32::MAX as u32) as i32);

    let mut state = pollster::block_on(GpuState::new(&window))?;
    panel.on_pointer_move();
    let mut shown_title = String::new();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { .. } => {
                panel.on_pointer_move();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => controller.reverse(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if logical_key == Key::Named(NamedKey::Escape) {
                    elwt.exit();
                } else if let Some(command) = key_name(&logical_key).and_then(command_for_key) {
                    if let Err(e) = apply_command(command, &mut controller, &mut store, max_box) {
                        log::error!("[settings] save to {} failed: {e}", store.path().display());
                    }
                    panel.on_pointer_move();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if idle.poll(now) && panel.on_idle_timeout() {
                log::debug!("[panel] hidden");
            }
            controller.frame(now);

            let title = if panel.is_visible() {
                panel_title(&controller)
            } else {
                WINDOW_TITLE.to_string()
            };
            if title != shown_title {
                state.window.set_title(&title);
                shown_title = title;
            }

            let render_result = state.render(&scene.borrow());
            match render_result {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}

// ---------------- Native audio (cpal) ----------------

#[derive(Clone)]
struct Plink {
    phase: f32,     // radians
    phase_inc: f32, // radians per sample
    total_samples: u32,
    samples_emitted: u32,
    attack_samples: u32,
}

struct AudioState {
    sample_rate: f32,
    voices: Vec<Plink>,
}

/// Synthesized plink on the default output device. Without a device every
/// cue is silently dropped.
struct ToneSound {
    state: Option<Arc<Mutex<AudioState>>>,
    _stream: Option<cpal::Stream>,
}

impl ToneSound {
    fn start() -> Self {
        match start_audio() {
            Ok((stream, state)) => Self {
                state: Some(state),
                _stream: Some(stream),
            },
            Err(e) => {
                log::warn!("[sound] audio output unavailable: {e}");
                Self {
                    state: None,
                    _stream: None,
                }
            }
        }
    }
}

impl SoundCue for ToneSound {
    fn play(&mut self) {
        let Some(state) = &self.state else {
            return;
        };
        let Ok(mut guard) = state.lock() else {
            log::warn!("[sound] audio state poisoned");
            return;
        };
        let sr = guard.sample_rate;
        let total = ((TONE_DURATION_SEC * sr) as u32).max(1);
        guard.voices.push(Plink {
            phase: 0.0,
            phase_inc: std::f32::consts::TAU * TONE_FREQUENCY_HZ / sr,
            total_samples: total,
            samples_emitted: 0,
            attack_samples: ((TONE_ATTACK_SEC * sr) as u32).min(total),
        });
    }
}

fn start_audio() -> anyhow::Result<(cpal::Stream, Arc<Mutex<AudioState>>)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("no output device"))?;
    let config = device.default_output_config()?;
    let state = Arc::new(Mutex::new(AudioState {
        sample_rate: config.sample_rate().0 as f32,
        voices: Vec::new(),
    }));

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), Arc::clone(&state))?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), Arc::clone(&state))?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), Arc::clone(&state))?,
        other => anyhow::bail!("unsupported sample format {other:?}"),
    };
    stream.play()?;
    log::info!("[sound] audio output started");
    Ok((stream, state))
}

// Short attack then a linear release to silence over the rest of the plink
fn mix_sample(voices: &mut Vec<Plink>) -> f32 {
    let mut out = 0.0f32;
    let mut i = 0usize;
    while i < voices.len() {
        let v = &mut voices[i];
        let n = v.samples_emitted;
        let env = if n < v.attack_samples {
            n as f32 / v.attack_samples.max(1) as f32
        } else {
            let release = (v.total_samples - v.attack_samples).max(1);
            1.0 - (n - v.attack_samples) as f32 / release as f32
        };
        out += v.phase.sin() * TONE_GAIN * env;
        v.phase = (v.phase + v.phase_inc) % std::f32::consts::TAU;
        v.samples_emitted += 1;
        if v.samples_emitted >= v.total_samples {
            voices.swap_remove(i);
            continue;
        }
        i += 1;
    }
    out.tanh()
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    state: Arc<Mutex<AudioState>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut guard) = state.lock() else {
                data.fill(T::EQUILIBRIUM);
                return;
            };
            for frame in data.chunks_mut(channels) {
                let value = T::from_sample(mix_sample(&mut guard.voices));
                frame.fill(value);
            }
        },
        |err| log::error!("[sound] audio stream error: {err}"),
        None,
    )
}
