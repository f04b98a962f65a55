//! Light sources

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::space::SpaceComponent;
use crate::ecs::{Component, EntityId, Handle, Kind, Membership, MultiMembers, System};
use crate::foundation::math::Vec3;

/// Point light emitted from the entity's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightComponent {
    /// Intensity multiplier
    pub strength: f32,
    /// RGB colour, each channel in `0.0..=1.0`
    pub color: Vec3,
}

impl Component for LightComponent {
    const KIND: Kind = "Light";
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            strength: 1.0,
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// A light as seen by shading code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Entity carrying the light
    pub entity: EntityId,
    /// World position
    pub position: Vec3,
    /// Intensity multiplier
    pub strength: f32,
    /// RGB colour
    pub color: Vec3,
}

/// Light list shared between the light system and its consumers
pub type LightList = Rc<RefCell<Vec<LightSource>>>;

type Lit = (Handle<LightComponent>, Handle<SpaceComponent>);

/// Collects every light of the scene
#[derive(Default)]
pub struct LightSystem {
    members: MultiMembers<Lit>,
    lights: LightList,
}

impl LightSystem {
    /// Create a light system
    pub fn new() -> Self {
        Self::default()
    }

    /// All current light sources, in ascending entity order
    pub fn sources(&self) -> Vec<LightSource> {
        self.members
            .iter()
            .map(|(entity, (light, space))| {
                let light = light.borrow();
                LightSource {
                    entity,
                    position: space.borrow().position(),
                    strength: light.strength,
                    color: light.color,
                }
            })
            .collect()
    }

    /// Handle to the light list, refreshed by every update
    pub fn light_list(&self) -> LightList {
        Rc::clone(&self.lights)
    }
}

impl System for LightSystem {
    fn name(&self) -> &'static str {
        "Light"
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn update(&mut self, _delta: Duration) {
        let sources = self.sources();
        *self.lights.borrow_mut() = sources;
    }
}
