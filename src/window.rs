use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    animation::SystemClock,
    assets::{self, AssetEvent},
    cards::CardKind,
    config::{AssetPaths, RenderConfig},
    engine::FrameDriver,
    rendering::renderer::Renderer,
};

struct App {
    renderer: Option<Renderer>,
    driver: FrameDriver<SystemClock>,
    render_config: RenderConfig,
}

impl App {
    fn new(kind: CardKind, render_config: RenderConfig) -> Self {
        Self {
            renderer: None,
            driver: FrameDriver::new(kind.build(), SystemClock::new()),
            render_config,
        }
    }

    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Renderer> {
        let window_attributes =
            Window::default_attributes().with_title(self.driver.card().title());
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        pollster::block_on(Renderer::new(
            Arc::new(window),
            self.driver.card().stage(),
            &self.render_config,
        ))
    }
}

impl ApplicationHandler<AssetEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &self.renderer {
            self.driver.start();
            renderer.window.request_redraw();
            return;
        }

        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                renderer.window.request_redraw();
                self.renderer = Some(renderer);
                self.driver.start();
            }
            Err(err) => {
                log::error!("Failed to initialize renderer: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.driver.stop();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AssetEvent) {
        self.driver.apply_asset(event);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.driver.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                if !self.driver.frame() {
                    return;
                }

                let now = self.driver.now() as f32;
                match renderer.render(self.driver.card().stage(), now) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }

                renderer.window.request_redraw();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.driver.pointer_down();
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.driver.pointer_down();
            }
            _ => (),
        }
    }
}

/// Opens a window showing `kind` and runs until it is closed.
pub async fn run(kind: CardKind) -> anyhow::Result<()> {
    let event_loop = EventLoop::<AssetEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;

    let proxy = event_loop.create_proxy();
    assets::spawn_loads(&AssetPaths::default(), move |event| {
        if proxy.send_event(event).is_err() {
            log::warn!("Event loop closed before an asset finished loading");
        }
    });

    let mut app = App::new(kind, RenderConfig::default());
    event_loop.run_app(&mut app)?;

    Ok(())
}
