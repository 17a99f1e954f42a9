//! Application shell: winit event loop driving the playback loop
//!
//! `resumed` acquires the window, the renderer and the media source in that
//! order; `window_event` queues input; `about_to_wait` runs one playback
//! tick; `exiting` drops everything in reverse.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::media::VideoSource;
use crate::playback::{InputEvent, LoopState, PlaybackLoop};
use crate::render::WindowPresenter;

type Session = PlaybackLoop<VideoSource, WindowPresenter>;

/// Event-loop handler owning the playback session
pub struct PlayerApp {
    video_path: PathBuf,
    config: PlayerConfig,
    session: Option<Session>,
    /// Input received since the last tick
    pending_events: Vec<InputEvent>,
    /// First initialization failure, reported once the loop has exited
    error: Option<PlayerError>,
}

impl PlayerApp {
    pub fn new(video_path: impl Into<PathBuf>, config: PlayerConfig) -> Self {
        Self {
            video_path: video_path.into(),
            config,
            session: None,
            pending_events: Vec::new(),
            error: None,
        }
    }

    /// Initialization error, if startup failed
    pub fn into_result(self) -> Result<(), PlayerError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Window, renderer, then media; an early return drops what was acquired
    fn start_session(&self, event_loop: &ActiveEventLoop) -> Result<Session, PlayerError> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window_title.as_str())
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let presenter = WindowPresenter::new(window)?;
        let source = VideoSource::open(&self.video_path)?;

        tracing::info!(path = %self.video_path.display(), "Playback started");
        Ok(PlaybackLoop::new(source, presenter, &self.config))
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.error.is_some() {
            return;
        }

        match self.start_session(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                tracing::error!("Initialization failed: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.pending_events.push(InputEvent::Quit),
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.state.is_pressed() {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(input) = InputEvent::from_key(code) {
                        self.pending_events.push(input);
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.presenter_mut().resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.tick(self.pending_events.drain(..)) == LoopState::Quitting {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            let frames = session.frames_presented();
            drop(session);
            tracing::info!(frames, "Playback stopped, resources released");
        }
    }
}

/// Play `video_path` until the user quits
///
/// Returns the first initialization failure; a clean quit returns `Ok`.
pub fn run(video_path: impl AsRef<Path>, config: &PlayerConfig) -> Result<(), PlayerError> {
    let event_loop = EventLoop::new().map_err(PlayerError::DisplayInit)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(video_path.as_ref(), config.clone());
    event_loop.run_app(&mut app).map_err(PlayerError::EventLoop)?;

    app.into_result()
}
