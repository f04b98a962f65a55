//! Headless backend
//!
//! Replays a script of input frames instead of talking to a windowing
//! toolkit. Each call to `poll_events` consumes one scripted frame.

use std::collections::VecDeque;

use crate::window::{Backend, BackendError, RawEvent, WindowArgs};

/// Surface of the headless backend
#[derive(Debug)]
pub struct HeadlessSurface {
    /// Title the surface was opened with
    pub title: String,
    /// Frames presented on this surface
    pub presented: u64,
}

/// Backend replaying scripted input frames
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    script: VecDeque<Vec<RawEvent>>,
    quit_when_drained: bool,
    fail_surface: bool,
    surfaces_created: usize,
    polls: u64,
    swaps: u64,
    quit_called: bool,
}

impl HeadlessBackend {
    /// Backend with an empty script that never asks to quit
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend replaying `frames`, then asking to quit
    pub fn with_frames(frames: impl IntoIterator<Item = Vec<RawEvent>>) -> Self {
        Self {
            script: frames.into_iter().collect(),
            quit_when_drained: true,
            ..Self::default()
        }
    }

    /// Builder: whether a drained script produces a quit event
    #[must_use]
    pub fn quit_when_drained(mut self, quit: bool) -> Self {
        self.quit_when_drained = quit;
        self
    }

    /// Builder: make surface creation fail
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_surface = true;
        self
    }

    /// Append a frame of input to the script
    pub fn push_frame(&mut self, events: Vec<RawEvent>) {
        self.script.push_back(events);
    }

    /// Scripted frames not polled yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Number of surfaces opened
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    /// Number of polls
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of presented frames
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Whether the surface has been closed
    pub fn has_quit(&self) -> bool {
        self.quit_called
    }
}

impl Backend for HeadlessBackend {
    type Surface = HeadlessSurface;

    fn create_surface(&mut self, args: &WindowArgs) -> Result<HeadlessSurface, BackendError> {
        if self.fail_surface {
            return Err(BackendError::SurfaceCreationFailed(format!(
                "headless surface '{}' refused",
                args.title
            )));
        }
        self.surfaces_created += 1;
        log::debug!("Headless surface '{}' {}x{}", args.title, args.width, args.height);
        Ok(HeadlessSurface {
            title: args.title.clone(),
            presented: 0,
        })
    }

    fn swap(&mut self, surface: &mut HeadlessSurface) {
        surface.presented += 1;
        self.swaps += 1;
    }

    fn poll_events(&mut self, _surface: &mut HeadlessSurface) -> Vec<RawEvent> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(events) => events,
            None if self.quit_when_drained => vec![RawEvent::Quit],
            None => Vec::new(),
        }
    }

    fn quit(&mut self, surface: HeadlessSurface) {
        log::debug!(
            "Headless surface '{}' closed after {} frames",
            surface.title,
            surface.presented
        );
        self.quit_called = true;
    }
}
