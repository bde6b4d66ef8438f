//! The static heading layer drawn over the particle backdrop.
//!
//! Wraps egui context, winit state, and wgpu renderer. The heading is a
//! single centered, non-interactive label; it never intercepts input meant
//! for the window.

use std::sync::Arc;
use winit::window::Window;

/// Heading overlay state.
pub struct HeadingOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    text: String,
}

/// Output from one overlay frame, ready for prepare/render.
pub struct OverlayFrame {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl HeadingOverlay {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
        text: impl Into<String>,
    ) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self {
            ctx,
            state,
            renderer,
            text: text.into(),
        }
    }

    /// Process a winit event (scale factor changes and the like).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Run one overlay frame: lay out the centered heading and tessellate.
    pub fn frame(&mut self, window: &Window) -> OverlayFrame {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);

        egui::Area::new(egui::Id::new("greeting-heading"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(&self.ctx, |ui| {
                ui.label(
                    egui::RichText::new(&self.text)
                        .size(48.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
            });

        let full_output = self.ctx.end_pass();
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Upload textures and buffers. Call before opening the render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &OverlayFrame,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.paint_jobs,
            screen_descriptor,
        );
    }

    /// Paint the heading into an open render pass, above the particles.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        frame: &OverlayFrame,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer
            .render(render_pass, &frame.paint_jobs, screen_descriptor);
    }

    /// Free textures after the frame is done.
    pub fn cleanup(&mut self, frame: &OverlayFrame) {
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
