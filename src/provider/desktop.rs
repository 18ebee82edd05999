use crate::*;

use glow::HasContext;
use glutin::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    Api, GlProfile, GlRequest,
};
use log::{error, info, warn};
use thiserror::Error;

use std::thread::sleep;
use std::time::{Duration, Instant};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("couldn't create the preview window: {0}")]
    WindowCreation(#[from] glutin::CreationError),
    #[error("couldn't make the OpenGL context current: {0}")]
    ContextActivation(glutin::ContextError),
    #[error(transparent)]
    Effect(#[from] EffectError),
}

/// Opens a desktop window and lets *plugin* render into it, the way a host would: `init_gl` once
/// the window exists, `process_gl` roughly every 16 milliseconds, `resize` whenever the window
/// is resized and `deinit_gl` when the window is closed.
///
/// This function only returns when the window couldn't be set up. Once the event loop runs, it
/// exits the process when the window is closed or the plug-in fails.
pub fn start<P>(mut plugin: P, title: &str) -> Result<(), PreviewError>
where
    P: HostPlugin<GlowBackend> + 'static,
{
    let event_loop = EventLoop::new();
    let builder = WindowBuilder::new()
        .with_decorations(true)
        .with_maximized(false)
        .with_resizable(true)
        .with_title(title)
        .with_visible(true);
    let windowed_context = unsafe {
        glutin::ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (4, 1)))
            .with_gl_profile(GlProfile::Core)
            .build_windowed(builder, &event_loop)?
            .make_current()
            .map_err(|(_, error)| PreviewError::ContextActivation(error))?
    };

    // SAFETY: the context stays current on this thread for the rest of the process
    let gpu = unsafe {
        GlowBackend::from_loader_function(|function_name| {
            windowed_context.get_proc_address(function_name)
        })
    };

    let viewport = viewport_of(windowed_context.window().inner_size());
    set_gl_viewport(&gpu, &viewport);
    plugin.init_gl(&gpu, &viewport)?;
    info!("Started the preview of {} at {:?}", P::INFO.name, viewport);

    let frame = FrameContext::default();
    let start_time = Instant::now();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _target, control_flow| {
        // `Poll` with a manual sleep gives a steady frame rate without spinning
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                plugin.deinit_gl(&gpu);
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                windowed_context.resize(size);
                let viewport = viewport_of(size);
                set_gl_viewport(&gpu, &viewport);
                plugin.resize(&viewport);
            }
            Event::MainEventsCleared => {
                let elapsed_time = last_frame.elapsed().as_millis();
                if elapsed_time < 16 {
                    sleep(Duration::from_millis(16 - elapsed_time as u64));
                }
                last_frame = Instant::now();

                plugin.set_time(start_time.elapsed().as_secs_f64());
                unsafe {
                    gpu.gl().clear_color(0.0, 0.0, 0.0, 1.0);
                    gpu.gl().clear(glow::COLOR_BUFFER_BIT);
                }
                if let Err(render_error) = plugin.process_gl(&gpu, &frame) {
                    error!("The preview failed to render: {}", render_error);
                    plugin.deinit_gl(&gpu);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                if let Err(swap_error) = windowed_context.swap_buffers() {
                    warn!("Couldn't swap the buffers: {}", swap_error);
                }
            }
            _ => (),
        }
    })
}

fn viewport_of(size: PhysicalSize<u32>) -> Viewport {
    Viewport::with_size(0, 0, size.width, size.height)
}

fn set_gl_viewport(gpu: &GlowBackend, viewport: &Viewport) {
    unsafe {
        gpu.gl().viewport(
            viewport.x as i32,
            viewport.y as i32,
            viewport.width as i32,
            viewport.height as i32,
        );
    }
}
