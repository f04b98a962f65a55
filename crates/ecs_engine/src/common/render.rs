//! Render component and the draw-list builder
//!
//! Geometry loading and GPU submission are the game's business. The render
//! system only decides what is drawn this frame and with which matrices.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::camera::CameraMessage;
use super::space::SpaceComponent;
use crate::ecs::{Component, EntityId, Handle, Kind, Membership, MultiMembers, System};
use crate::foundation::math::Mat4;
use crate::scene::SceneContext;

/// Visual appearance of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct RenderComponent {
    mesh: PathBuf,
    /// RGBA colour, each channel in `0.0..=1.0`
    pub color: [f32; 4],
    /// Hidden entities stay wired but are left out of the draw list
    pub visible: bool,
}

impl Component for RenderComponent {
    const KIND: Kind = "Render";
}

impl RenderComponent {
    /// White, visible mesh loaded from `mesh`
    pub fn new(mesh: impl Into<PathBuf>) -> Self {
        Self {
            mesh: mesh.into(),
            color: [1.0, 1.0, 1.0, 1.0],
            visible: true,
        }
    }

    /// Builder: set the colour
    #[must_use]
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Mesh file
    pub fn mesh(&self) -> &Path {
        &self.mesh
    }
}

/// One entry of the per-frame draw list
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity being drawn
    pub entity: EntityId,
    /// Mesh file
    pub mesh: PathBuf,
    /// RGBA colour
    pub color: [f32; 4],
    /// Model matrix
    pub model: Mat4,
    /// Projection times view times model
    pub mvp: Mat4,
}

/// Draw list shared between the render system and whoever submits it
pub type DrawList = Rc<RefCell<Vec<DrawCommand>>>;

type Drawable = (Handle<RenderComponent>, Handle<SpaceComponent>);

/// Builds the draw list of all visible entities every frame
///
/// The view-projection comes from the latest [`CameraMessage`].
pub struct RenderSystem {
    members: MultiMembers<Drawable>,
    view_projection: Rc<Cell<Mat4>>,
    draws: DrawList,
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self {
            members: MultiMembers::new(),
            view_projection: Rc::new(Cell::new(Mat4::identity())),
            draws: DrawList::default(),
        }
    }
}

impl RenderSystem {
    /// Create a render system
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the draw list, refreshed by every update
    pub fn draw_list(&self) -> DrawList {
        Rc::clone(&self.draws)
    }

    /// View-projection used for the next draw list
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection.get()
    }
}

impl System for RenderSystem {
    fn name(&self) -> &'static str {
        "Render"
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn init(&mut self, ctx: &SceneContext<'_>) {
        if ctx.args.debug {
            log::debug!("Render system ready for scene '{}'", ctx.scene);
        }
    }

    fn focus(&mut self, ctx: &SceneContext<'_>) {
        let view_projection = Rc::clone(&self.view_projection);
        ctx.mailbox
            .listen(move |camera: &CameraMessage, _| view_projection.set(camera.view_projection));
    }

    fn update(&mut self, _delta: Duration) {
        let view_projection = self.view_projection.get();
        let mut draws = self.draws.borrow_mut();
        draws.clear();

        for (entity, (render, space)) in self.members.iter() {
            let render = render.borrow();
            if !render.visible {
                continue;
            }
            let model = space.borrow().model_matrix();
            draws.push(DrawCommand {
                entity,
                mesh: render.mesh.clone(),
                color: render.color,
                model,
                mvp: view_projection * model,
            });
        }
    }
}
