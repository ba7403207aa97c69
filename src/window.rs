use std::{sync::Arc, time::Instant};

use anyhow::Context;
use skills_cube::{
    config::CubeConfig,
    cube::SkillsCube,
    fragments::spawn_default_fragments,
    page::HostSize,
    rendering::Renderer,
    scroll::SectionRect,
};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

const LINE_HEIGHT: f64 = 40.0;

/// Stand-in for the page section the cube reacts to. The mouse wheel scrolls
/// it past a viewport the height of the window.
struct VirtualSection {
    scroll_y: f64,
    height: f64,
}

impl VirtualSection {
    fn scroll_by(&mut self, delta: f64) {
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, self.height);
    }

    fn rect(&self) -> SectionRect {
        SectionRect {
            top: -self.scroll_y,
            height: self.height,
        }
    }
}

struct App {
    config: CubeConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    cube: Option<SkillsCube>,
    section: VirtualSection,
    start_time: Instant,
}

impl App {
    fn new(config: CubeConfig) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            cube: None,
            section: VirtualSection {
                scroll_y: 0.0,
                height: 2400.0,
            },
            start_time: Instant::now(),
        }
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .as_ref()
            .map(|window| {
                window
                    .inner_size()
                    .to_logical::<f64>(window.scale_factor())
                    .height
            })
            .unwrap_or(self.config.default_height)
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Skills cube preview")
            .with_inner_size(LogicalSize::new(
                self.config.default_width * self.config.surface_scale,
                self.config.default_height * self.config.surface_scale,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create preview window")?,
        );

        let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
        let cube = SkillsCube::new(
            self.config.clone(),
            HostSize {
                width: logical.width,
                height: logical.height,
            },
            window.scale_factor(),
        );

        let size = window.inner_size();
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            (size.width, size.height),
            &cube,
        ))?;

        let fragments = spawn_default_fragments(&mut rand::thread_rng());
        log::info!("Spawned {} code fragments", fragments.len());
        for fragment in &fragments {
            log::debug!(
                "{:?} {} {}",
                fragment.text,
                fragment.class_name(),
                fragment.css_text()
            );
        }

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.cube = Some(cube);

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.setup(event_loop) {
            log::error!("Failed to start preview: {:?}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize((new_size.width, new_size.height));
                }
                if let Some(cube) = self.cube.as_mut() {
                    cube.camera
                        .set_aspect(new_size.width as f64, new_size.height as f64);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -(y as f64) * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y,
                };
                self.section.scroll_by(delta);

                let viewport_height = self.viewport_height();
                if let Some(cube) = self.cube.as_ref() {
                    cube.on_scroll(Some(self.section.rect()), viewport_height);
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(window), Some(renderer), Some(cube)) = (
                    self.window.as_ref(),
                    self.renderer.as_mut(),
                    self.cube.as_mut(),
                ) else {
                    return;
                };

                window.request_redraw();
                cube.advance(self.start_time.elapsed().as_secs_f32());

                match renderer.render(cube) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure();
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
            }
            _ => (),
        }
    }
}

pub fn run(config: CubeConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
