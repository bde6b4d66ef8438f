//! Page composition: the particle backdrop stacked beneath a greeting
//! heading, driven by the winit event loop.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::Camera;
use crate::error::AppError;
use crate::field::ParticleField;
use crate::gpu::GpuState;

const WINDOW_TITLE: &str = "driftfield";
const HEADING: &str = "Hello, wgpu + winit!";

/// Build the event loop and run the greeting page until the window closes.
pub fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}

pub struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Option<ParticleField>,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu_state: None,
            field: None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // The pool is allocated from the viewport available at mount time.
        let size = window.inner_size();
        let aspect = size.width as f32 / size.height.max(1) as f32;
        let field = ParticleField::new(Camera::new().world_viewport(aspect));

        match pollster::block_on(GpuState::new(window.clone(), &field, HEADING)) {
            Ok(gpu_state) => {
                self.window = Some(window);
                self.gpu_state = Some(gpu_state);
                self.field = Some(field);
            }
            Err(e) => {
                eprintln!("GPU initialization failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
            gpu_state.overlay_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                    if let Some(field) = &mut self.field {
                        field.handle_resize(gpu_state.world_viewport().width);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state), Some(field)) =
                    (&self.window, &mut self.gpu_state, &mut self.field)
                {
                    field.advance(gpu_state.world_viewport());

                    match gpu_state.render(window, field) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
