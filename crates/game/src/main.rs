//! Backrooms: an infinite destructible maze, software-rendered and blitted
//! to the window through wgpu.

mod ambience;
mod config;
mod destruction;
mod player;
mod save;
mod scene;
mod world;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use audio::{AudioSystem, SoundEvent};
use engine_core::Time;
use input::{InputState, KeyCode};
use renderer::Frame;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::GameConfig;
use crate::save::SaveData;
use crate::world::WorldEngine;

fn save_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("save.ron")
}

/// The offscreen frame texture plus the pipeline that stretches it over
/// the window.
struct Blit {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl Blit {
    fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
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
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Nearest keeps the pixels crisp when the frame renders below
        // window resolution.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let (texture, bind_group) =
            Self::create_texture(device, &bind_group_layout, &sampler, 1, 1);

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            texture,
            bind_group,
            width: 1,
            height: 1,
        }
    }

    fn create_texture(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::BindGroup) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        (texture, bind_group)
    }

    /// Upload the frame, recreating the texture when its size changed.
    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &Frame) {
        let (w, h) = (frame.width() as u32, frame.height() as u32);
        if w == 0 || h == 0 {
            return;
        }
        if w != self.width || h != self.height {
            let (texture, bind_group) =
                Self::create_texture(device, &self.bind_group_layout, &self.sampler, w, h);
            self.texture = texture;
            self.bind_group = bind_group;
            self.width = w;
            self.height = h;
        }
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(w * 4),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }
}

struct GameState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    blit: Blit,

    frame: Frame,
    world: WorldEngine,
    input: InputState,
    time: Time,
    audio: Option<AudioSystem>,
    config: GameConfig,
    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Mailbox when available for low-latency vsync.
        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &surface_config);

        let blit = Blit::new(&device, surface_format);

        let seed = config.world_seed.unwrap_or_else(rand::random);
        let world = WorldEngine::new(seed, config.render_scale);

        let audio = match AudioSystem::new() {
            Ok(mut audio) => {
                load_sounds(&mut audio);
                Some(audio)
            }
            Err(e) => {
                log::warn!("Audio unavailable, continuing silent: {}", e);
                None
            }
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            blit,
            frame: Frame::new(1, 1),
            world,
            input: InputState::new(),
            time: Time::new(),
            audio,
            config,
            running: true,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn grab_cursor(&mut self) {
        let _ = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        self.window.set_cursor_visible(false);
        self.input.set_cursor_locked(true);
    }

    fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.input.set_cursor_locked(false);
    }

    /// Returns `true` when the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => return true,
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if pressed {
                        match code {
                            // First Escape releases the cursor, second quits.
                            KeyCode::Escape => {
                                if self.input.cursor_locked() {
                                    self.release_cursor();
                                } else {
                                    self.running = false;
                                }
                                return false;
                            }
                            KeyCode::F4 => {
                                self.world.toggle_render_scale();
                                return false;
                            }
                            KeyCode::F5 => {
                                self.save_game();
                                return false;
                            }
                            KeyCode::F9 => {
                                self.load_game();
                                return false;
                            }
                            _ => {}
                        }
                    }
                    self.input.on_key(code, pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Pressed && !self.input.cursor_locked() {
                    self.grab_cursor();
                } else {
                    self.input
                        .on_mouse_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                self.tick();
                self.window.request_redraw();
            }
            _ => {}
        }
        false
    }

    fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.on_mouse_motion(delta.0, delta.1);
        }
    }

    /// One frame: simulate, render the software frame, blit, present.
    fn tick(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        let frame_input = self.input.frame_input(self.config.sensitivity);
        self.world.update(dt, &frame_input);

        if let Some(audio) = &mut self.audio {
            for request in self.world.take_sounds() {
                audio.play(request);
            }
        } else {
            self.world.take_sounds();
        }

        let scale = self.world.render_scale();
        let fw = ((self.surface_config.width as f32 * scale) as usize).max(1);
        let fh = ((self.surface_config.height as f32 * scale) as usize).max(1);
        self.frame.resize(fw, fh);
        self.world.render(&mut self.frame);

        self.blit.upload(&self.device, &self.queue, &self.frame);
        if let Err(e) = self.present() {
            match e {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    self.surface.configure(&self.device, &self.surface_config);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    log::error!("Surface out of memory");
                    self.running = false;
                }
                _ => log::warn!("Surface error: {:?}", e),
            }
        }

        if self.time.frame_count() % 300 == 0 {
            log::debug!(
                "fps {:.0}, {} debris, {} walls destroyed",
                self.time.fps(),
                self.world.debris.len(),
                self.world.topo.destroyed_count()
            );
        }

        self.input.begin_frame();
    }

    fn present(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.blit.pipeline);
            pass.set_bind_group(0, &self.blit.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn save_game(&mut self) {
        let path = save_path();
        match self.world.snapshot().write_to(&path) {
            Ok(()) => log::info!("Saved to {:?}", path),
            Err(e) => log::error!("Save failed: {}", e),
        }
    }

    fn load_game(&mut self) {
        let path = save_path();
        match SaveData::read_from(&path) {
            Ok(save) => {
                self.world.restore(&save);
                log::info!("Loaded {:?}", path);
            }
            Err(e) => log::error!("Load failed: {}", e),
        }
    }
}

/// Load the sound set from `sounds/` next to the executable's working
/// directory. Missing files just log; the game runs silent without them.
fn load_sounds(audio: &mut AudioSystem) {
    let sounds = [
        (SoundEvent::Hum, "hum.ogg"),
        (SoundEvent::Footstep, "footstep.ogg"),
        (SoundEvent::PlayerFootstep, "player_footstep.ogg"),
        (SoundEvent::CrouchFootstep, "crouch_footstep.ogg"),
        (SoundEvent::Buzz, "buzz.ogg"),
        (SoundEvent::Destroy, "destroy.ogg"),
    ];
    for (event, file) in sounds {
        let path = Path::new("sounds").join(file);
        if let Err(e) = audio.load_sound(event, &path) {
            log::warn!("Could not load {:?}: {}", path, e);
        }
    }
}

struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let mut window_attrs = Window::default_attributes()
                .with_title("Backrooms")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));
            if config.fullscreen {
                window_attrs = window_attrs
                    .with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), config)) {
                Ok(mut state) => {
                    state.grab_cursor();
                    self.state = Some(state);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                  BACKROOMS                   ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  WASD        - Move     │  Mouse - Look      ║");
    println!("║  Shift       - Run      │  Space - Jump      ║");
    println!("║  C           - Crouch   │  Click/F - Destroy ║");
    println!("║  F4          - Render scale toggle           ║");
    println!("║  F5 / F9     - Save / Load                   ║");
    println!("║  Escape      - Release cursor, then quit     ║");
    println!("╚══════════════════════════════════════════════╝");

    log::info!("Starting Backrooms");

    let event_loop = EventLoop::new()?;
    // Poll continuously; waiting for events would stall redraws.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
