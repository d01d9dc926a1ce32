//! Native host: runs a [`DynamicBackground`] in a winit window on a
//! [`GpuCanvas`].

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::background::{BackgroundBuilder, DynamicBackground};
use crate::canvas::Viewport;
use crate::error::BackgroundError;
use crate::gpu::GpuCanvas;

/// Pixels scrolled per wheel line.
const LINE_SCROLL_PX: f32 = 40.0;

pub(crate) fn run<F: 'static>(builder: BackgroundBuilder<F>) -> Result<(), BackgroundError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(builder);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn viewport(size: PhysicalSize<u32>) -> Viewport {
    Viewport::new(size.width, size.height)
}

struct App<F> {
    builder: Option<BackgroundBuilder<F>>,
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    background: Option<DynamicBackground<F>>,
    scroll_offset: f32,
    error: Option<BackgroundError>,
}

impl<F> App<F> {
    fn new(builder: BackgroundBuilder<F>) -> Self {
        Self {
            builder: Some(builder),
            window: None,
            canvas: None,
            background: None,
            scroll_offset: 0.0,
            error: None,
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(background) = &mut self.background else {
            return;
        };
        let Some(canvas) = &mut self.canvas else {
            background.on_frame_without_canvas();
            return;
        };

        background.on_frame(canvas);
        match canvas.present(&background.overlay_style()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => canvas.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::warn!("GPU out of memory, closing");
                background.unmount();
                event_loop.exit();
            }
            Err(e) => tracing::warn!("Render error: {:?}", e),
        }
    }
}

impl<F> ApplicationHandler for App<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(builder) = self.builder.take() else {
            return;
        };

        let window_attrs = Window::default_attributes()
            .with_title("particle-field")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let size = viewport(window.inner_size());
        self.canvas = match pollster::block_on(GpuCanvas::new(window.clone())) {
            Ok(canvas) => Some(canvas),
            Err(e) => {
                tracing::debug!("GPU canvas unavailable: {}", e);
                None
            }
        };

        self.background = Some(builder.mount(self.canvas.as_mut(), size));
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(background) = &mut self.background {
                    background.unmount();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let (Some(background), Some(canvas)) = (&mut self.background, &mut self.canvas)
                {
                    background.on_resize(canvas, viewport(physical_size));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scrolled = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * LINE_SCROLL_PX,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                // Wheel down reports negative y and scrolls the page down
                self.scroll_offset = (self.scroll_offset - scrolled).max(0.0);
                if let Some(background) = &mut self.background {
                    background.on_scroll(self.scroll_offset);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
