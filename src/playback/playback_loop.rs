//! The steady-state playback loop
//!
//! One [`PlaybackLoop::tick`] drains the pending input events, reads one
//! packet and, when it belongs to the video stream, decodes and presents
//! every frame it yields.

use std::time::Duration;

use crate::config::PlayerConfig;
use crate::media::timing::{pts_to_micros, seek_target};
use crate::media::{PacketStatus, SeekDirection};

use super::{FramePacer, FrameSource, InputEvent, Presenter};

/// Loop state; the transition to `Quitting` is one-way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Quitting,
}

/// Drives a [`FrameSource`] into a [`Presenter`]
///
/// The source is declared before the presenter so it is released first,
/// the reverse of acquisition order.
pub struct PlaybackLoop<S: FrameSource, P: Presenter> {
    source: S,
    presenter: P,
    pacer: FramePacer,
    state: LoopState,
    /// Vestigial: there is no audio, the flag only flips
    audio_paused: bool,
    /// Position of the most recently decoded frame
    last_pts: Option<i64>,
    seek_step_frames: i64,
    idle_poll_interval: Duration,
    frames_presented: u64,
}

impl<S: FrameSource, P: Presenter> PlaybackLoop<S, P> {
    /// Take ownership of both providers and start the playback clock
    pub fn new(source: S, presenter: P, config: &PlayerConfig) -> Self {
        Self {
            source,
            presenter,
            pacer: FramePacer::start(),
            state: LoopState::Running,
            audio_paused: false,
            last_pts: None,
            seek_step_frames: config.seek_step_frames,
            idle_poll_interval: config.idle_poll_interval,
            frames_presented: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn audio_paused(&self) -> bool {
        self.audio_paused
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Run one loop iteration
    pub fn tick<I>(&mut self, events: I) -> LoopState
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.handle_event(event);
        }
        if self.state == LoopState::Quitting {
            return self.state;
        }

        match self.source.read_packet() {
            PacketStatus::Unavailable => {
                if !self.idle_poll_interval.is_zero() {
                    std::thread::sleep(self.idle_poll_interval);
                }
                return self.state;
            }
            PacketStatus::OtherStream => {}
            PacketStatus::Video => self.present_packet(),
        }

        self.source.release_packet();
        self.state
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                if self.state == LoopState::Running {
                    tracing::info!(frames = self.frames_presented, "Quit requested");
                }
                self.state = LoopState::Quitting;
            }
            InputEvent::TogglePause => {
                self.audio_paused = !self.audio_paused;
                tracing::debug!(paused = self.audio_paused, "Audio pause toggled");
            }
            InputEvent::SeekBackward => self.seek(SeekDirection::Backward),
            InputEvent::SeekForward => self.seek(SeekDirection::Forward),
        }
    }

    fn seek(&mut self, direction: SeekDirection) {
        let Some(current) = self.last_pts else {
            tracing::debug!(?direction, "Seek ignored, no frame decoded yet");
            return;
        };

        let target = seek_target(
            current,
            self.source.frame_duration(),
            self.seek_step_frames,
            direction,
        );
        if let Err(e) = self.source.seek(target, direction) {
            tracing::warn!(seek_target = target, ?direction, "{}", e);
        }
    }

    /// Decode the held packet and put each frame on screen
    fn present_packet(&mut self) {
        let time_base = self.source.time_base();
        let presenter = &mut self.presenter;
        let pacer = &self.pacer;
        let last_pts = &mut self.last_pts;
        let frames_presented = &mut self.frames_presented;

        self.source.decode_packet(&mut |frame| {
            if let Some(position) = frame.position() {
                *last_pts = Some(position);
            }

            presenter.clear();
            let mut texture = presenter.create_texture(frame.width, frame.height);
            if let Some(texture) = texture.as_mut() {
                presenter.upload(texture, frame);
                presenter.copy(texture);
                presenter.present();
                *frames_presented += 1;
            }

            // Paced even when the renderer skipped the frame
            if let Some(timestamp) = frame.best_effort_timestamp {
                pacer.wait_until(pts_to_micros(timestamp, time_base));
            }
            drop(texture);
        });
    }
}
