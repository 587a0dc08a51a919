use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::cards::Stage;
use crate::config::RenderConfig;
use crate::rendering::forward_pass::{ForwardPass, ForwardTextureViews};
use crate::rendering::global_uniform::{GlobalUniform, GlobalUniformState};
use crate::rendering::instance::Instance;
use crate::rendering::render_mesh::{render_mesh_instances, RenderMesh};
use crate::rendering::texture::DepthTexture;
use crate::scene_graph::MeshId;

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_texture: DepthTexture,
    global_uniform: GlobalUniform,
    forward_pass: ForwardPass,
    render_meshes: HashMap<MeshId, RenderMesh>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        stage: &Stage,
        render_config: &RenderConfig,
    ) -> anyhow::Result<Renderer> {
        let size = clamp_size(window.inner_size());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let power_preference = if render_config.high_performance_adapter {
            wgpu::PowerPreference::HighPerformance
        } else {
            wgpu::PowerPreference::LowPower
        };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible graphics adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no formats")?;

        let present_mode = if render_config.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, size, "Depth texture");
        let global_uniform = GlobalUniform::new(
            &device,
            GlobalUniformState::new(size, 0.0, &stage.camera, &stage.light),
        );
        let forward_pass = ForwardPass::create(&device, surface_format, &global_uniform);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            config,
            depth_texture,
            global_uniform,
            forward_pass,
            render_meshes: HashMap::new(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.depth_texture.resize(&self.device, new_size);
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Uploads meshes that were added to the scene since the last frame.
    fn sync_meshes(&mut self, stage: &Stage) {
        for (mesh_id, scene_mesh) in stage.scene.meshes.iter() {
            if self.render_meshes.contains_key(&mesh_id) {
                continue;
            }

            let render_mesh = RenderMesh::from_mesh(&self.device, &scene_mesh.mesh);
            log::debug!(
                "Uploaded mesh {} with {} indices",
                render_mesh.name,
                render_mesh.num_indices
            );
            self.render_meshes.insert(mesh_id, render_mesh);
        }
    }

    pub fn render(&mut self, stage: &Stage, now: f32) -> Result<(), wgpu::SurfaceError> {
        let window_size = self.window.inner_size();
        if window_size != self.size {
            self.resize(window_size);
        }

        self.sync_meshes(stage);

        for render_mesh in self.render_meshes.values_mut() {
            render_mesh.instances.clear();
        }

        for drawable in stage.scene.drawables() {
            if let Some(render_mesh) = self.render_meshes.get_mut(&drawable.mesh_id) {
                render_mesh
                    .instances
                    .add(Instance::new(drawable.world_matrix, drawable.color));
            }
        }

        for render_mesh in self.render_meshes.values_mut() {
            if render_mesh.should_render() {
                render_mesh.upload_instances(&self.device, &self.queue);
            }
        }

        self.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(self.size, now, &stage.camera, &stage.light),
        );

        let output = self.surface.get_current_texture()?;
        let output_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let texture_views = ForwardTextureViews {
            color: &output_view,
            depth: self.depth_texture.view(),
        };

        let render_meshes = &self.render_meshes;
        self.forward_pass.render(
            &texture_views,
            &mut encoder,
            &self.global_uniform,
            stage.clear_color,
            |render_pass| {
                for render_mesh in render_meshes.values() {
                    if render_mesh.should_render() {
                        render_mesh_instances(render_pass, render_mesh);
                    }
                }
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();

        Ok(())
    }
}

fn clamp_size(size: PhysicalSize<u32>) -> PhysicalSize<u32> {
    PhysicalSize::new(size.width.max(1), size.height.max(1))
}
