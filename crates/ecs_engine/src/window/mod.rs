//! Window and run loop
//!
//! The window owns the scenes, the backend and the mailbox. Exactly one scene
//! is displayed at a time:
//!
//! ```text
//! Uninitialized ──start──▶ Running(0) ──ChangeScene──▶ Switching{from, to} ──▶ Running(to)
//!                               │
//!                               └──Quit──▶ Terminated
//! ```
//!
//! Scene changes and quit requests arrive as messages during a frame and take
//! effect once the frame has been presented.

pub mod args;
pub mod backend;

pub use args::WindowArgs;
pub use backend::{Backend, BackendError, RawEvent};

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::events::{
    ChangeSceneMessage, KeyboardMessage, MailBox, MouseButtonMessage, MouseMotionMessage,
    MouseScrollMessage, QuitMessage,
};
use crate::foundation::time::Timer;
use crate::scene::Scene;

/// Run-loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Not started yet
    Uninitialized,
    /// Displaying the scene at this index
    Running(usize),
    /// Handing over between two scenes
    Switching {
        /// Scene being left
        from: usize,
        /// Scene being focused
        to: usize,
    },
    /// Closed; no further frames run
    Terminated,
}

/// Window errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The backend failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// `start` was called without any scene to display
    #[error("Window has no scenes to display")]
    NoScenes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Change(ChangeSceneMessage),
    Quit,
}

/// Quit wins over any scene change requested in the same frame
fn request(slot: &Cell<Option<Request>>, request: Request) {
    if slot.get() != Some(Request::Quit) {
        slot.set(Some(request));
    }
}

/// Game window driving a list of scenes
pub struct Window<B: Backend> {
    args: WindowArgs,
    backend: B,
    surface: Option<B::Surface>,
    scenes: Vec<Scene>,
    state: WindowState,
    mailbox: MailBox,
    requests: Rc<Cell<Option<Request>>>,
    timer: Timer,
}

impl<B: Backend> Window<B> {
    /// Create a window; nothing is opened until [`Window::start`]
    pub fn new(args: WindowArgs, backend: B) -> Self {
        Self {
            args,
            backend,
            surface: None,
            scenes: Vec::new(),
            state: WindowState::Uninitialized,
            mailbox: MailBox::new(),
            requests: Rc::new(Cell::new(None)),
            timer: Timer::new(),
        }
    }

    /// Append a scene and return its index
    pub fn add_scene(&mut self, scene: Scene) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    /// Append several scenes, in order
    pub fn add_scenes(&mut self, scenes: impl IntoIterator<Item = Scene>) {
        self.scenes.extend(scenes);
    }

    /// Scene at an index
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Mutable scene at an index
    pub fn scene_mut(&mut self, index: usize) -> Option<&mut Scene> {
        self.scenes.get_mut(index)
    }

    /// Number of scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Index of the displayed scene
    pub fn current(&self) -> Option<usize> {
        match self.state {
            WindowState::Running(index) => Some(index),
            _ => None,
        }
    }

    /// Run-loop state
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Window arguments
    pub fn args(&self) -> &WindowArgs {
        &self.args
    }

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Bus shared with the displayed scene
    pub fn mailbox(&self) -> &MailBox {
        &self.mailbox
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Open the surface and display the first scene
    pub fn start(&mut self) -> Result<(), WindowError> {
        if self.state != WindowState::Uninitialized {
            log::warn!("Window '{}' already started", self.args.title);
            return Ok(());
        }
        if self.scenes.is_empty() {
            return Err(WindowError::NoScenes);
        }

        let surface = self.backend.create_surface(&self.args)?;
        self.surface = Some(surface);
        log::info!(
            "Opened window '{}' ({}x{}) with {} scenes",
            self.args.title,
            self.args.width,
            self.args.height,
            self.scenes.len()
        );

        self.focus(0);
        Ok(())
    }

    /// Run one frame
    ///
    /// Polls input and sends it to the displayed scene, delivers posted
    /// messages, updates the scene and presents the surface. Pending scene
    /// changes and quit requests are applied afterwards. Returns whether the
    /// window is still running.
    ///
    /// # Panics
    /// Panics if an absolute [`ChangeSceneMessage`] names a scene that does not
    /// exist.
    pub fn frame(&mut self) -> bool {
        let WindowState::Running(current) = self.state else {
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let events = self.backend.poll_events(surface);
        let scene = &mut self.scenes[current];
        for event in events {
            deliver(&self.args, &self.requests, scene, event);
        }
        scene.dispatch_posted();

        let delta = self.timer.tick();
        scene.update(delta);

        if let Some(surface) = self.surface.as_mut() {
            self.backend.swap(surface);
        }

        match self.requests.take() {
            Some(Request::Quit) => self.close(),
            Some(Request::Change(change)) => {
                let count = self.scenes.len();
                let target = change.target(current, count).unwrap_or_else(|| {
                    panic!("Cannot change to scene {}: window has {} scenes", change.offset, count)
                });
                self.switch(current, target);
            }
            None => {}
        }

        self.state != WindowState::Terminated
    }

    /// Start if needed, then run frames until the window closes
    pub fn spawn(&mut self) -> Result<(), WindowError> {
        if self.state == WindowState::Uninitialized {
            self.start()?;
        }
        while self.frame() {}

        log::info!(
            "Window '{}' closed after {} frames ({:.1} fps average)",
            self.args.title,
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        Ok(())
    }

    /// Close the window immediately
    pub fn close(&mut self) {
        if let WindowState::Running(current) = self.state {
            self.scenes[current].blur();
        }
        self.mailbox.open();
        if let Some(surface) = self.surface.take() {
            self.backend.quit(surface);
        }
        self.state = WindowState::Terminated;
        log::debug!("Window '{}' terminated", self.args.title);
    }

    fn switch(&mut self, from: usize, to: usize) {
        self.state = WindowState::Switching { from, to };
        log::debug!("Switching scene {} -> {}", from, to);
        self.scenes[from].blur();
        self.focus(to);
    }

    fn focus(&mut self, index: usize) {
        self.mailbox.open();
        self.requests.set(None);

        let requests = Rc::clone(&self.requests);
        self.mailbox.listen(move |change: &ChangeSceneMessage, _| {
            request(&requests, Request::Change(*change));
        });
        let requests = Rc::clone(&self.requests);
        self.mailbox.listen(move |_: &QuitMessage, _| request(&requests, Request::Quit));

        let scene = &mut self.scenes[index];
        log::info!("Displaying scene {}: '{}'", index, scene.name());
        scene.init(&self.args, self.mailbox.clone());

        self.timer.reset();
        self.state = WindowState::Running(index);
    }
}

/// Translate one backend event and send it to the scene
#[allow(clippy::cast_possible_truncation)]
fn deliver(args: &WindowArgs, requests: &Cell<Option<Request>>, scene: &mut Scene, event: RawEvent) {
    match event {
        RawEvent::Quit => request(requests, Request::Quit),
        RawEvent::Key {
            key,
            scancode,
            pressed,
            modifiers,
            timestamp,
        } => scene.send(&KeyboardMessage {
            key,
            scancode,
            pressed,
            modifiers,
            timestamp,
        }),
        RawEvent::MouseButton {
            button,
            pressed,
            x,
            y,
            timestamp,
        } => {
            let (x, y) = args.to_ndc(x, y);
            scene.send(&MouseButtonMessage {
                button,
                pressed,
                x,
                y,
                timestamp,
            });
        }
        RawEvent::MouseMotion {
            x,
            y,
            x_rel,
            y_rel,
            timestamp,
        } => {
            let (x, y) = args.to_ndc(x, y);
            let (x_rel, y_rel) = args.to_ndc_delta(x_rel, y_rel);
            scene.send(&MouseMotionMessage {
                x,
                y,
                x_rel,
                y_rel,
                timestamp,
            });
        }
        RawEvent::MouseScroll { x, y, timestamp } => scene.send(&MouseScrollMessage {
            x: -x as f32,
            y: y as f32,
            timestamp,
        }),
    }
}
