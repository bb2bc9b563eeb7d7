use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crt_effect::{CrtEffect, SurfaceError};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::cli::Cli;
use crate::scene::{FrameSource, StillImage, TestScene};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let (width, height) = cli.size;
    let window = WindowBuilder::new()
        .with_title("CRT Arcade")
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut effect =
        CrtEffect::new(window.as_ref(), size).context("failed to initialise CRT effect")?;

    let mut source: Box<dyn FrameSource> = match cli.image.as_deref() {
        Some(path) => Box::new(StillImage::load(path)?),
        None => Box::new(TestScene::new(size.width, size.height)),
    };

    let frame_interval = cli
        .fps
        .filter(|fps| *fps > 0.0)
        .map(|fps| Duration::from_secs_f32(1.0 / fps));
    let started = Instant::now();
    let mut next_frame = Instant::now();

    tracing::info!(
        width = size.width,
        height = size.height,
        fps_cap = ?cli.fps,
        "starting arcade loop"
    );

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::Resized(new_size) => {
                    effect.resize(new_size);
                    source.resize(new_size.width, new_size.height);
                }
                WindowEvent::RedrawRequested => {
                    let frame = source.next_frame(started.elapsed().as_secs_f32());
                    match effect.render(frame, false) {
                        Ok(()) => {}
                        Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                            effect.resize(effect.size());
                        }
                        Err(SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(err) => {
                            tracing::warn!(error = ?err, "surface error; retrying next frame");
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => match frame_interval {
                Some(interval) => {
                    let now = Instant::now();
                    if now >= next_frame {
                        next_frame = now + interval;
                        window.request_redraw();
                        elwt.set_control_flow(ControlFlow::Wait);
                    } else {
                        elwt.set_control_flow(ControlFlow::WaitUntil(next_frame));
                    }
                }
                None => {
                    // Uncapped: Fifo presentation paces redraws to vsync.
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Poll);
                }
            },
            _ => {}
        })
        .map_err(|err| anyhow!("event loop error: {err}"))?;

    Ok(())
}
