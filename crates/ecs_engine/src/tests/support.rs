//! Shared fixtures for the crate's tests

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

use crate::ecs::{
    Component, ComponentRef, EntityId, Kind, Membership, MultiMembers, Requirement, SharedMembers,
    SingleMembers, System,
};
use crate::scene::SceneContext;

/// Ordered record of system callbacks
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Entries with the given prefix, prefix stripped
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|entry| entry.strip_prefix(prefix).map(str::to_string))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ShipComponent {
    pub hull: u32,
}

impl Component for ShipComponent {
    const KIND: Kind = "Ship";
}

#[derive(Debug)]
pub struct ThrustComponent(pub f32);

impl Component for ThrustComponent {
    const KIND: Kind = "Thrust";
}

#[derive(Debug, Default)]
pub struct PilotComponent;

impl Component for PilotComponent {
    const KIND: Kind = "Pilot";
}

/// System that records every callback it receives
pub struct ProbeSystem<R: Requirement, M: Membership = MultiMembers<R>> {
    name: &'static str,
    members: SharedMembers<M>,
    journal: Journal,
    requirement: PhantomData<R>,
}

impl<R: Requirement> ProbeSystem<R> {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self::with_members(name, journal)
    }
}

impl<R: Requirement> ProbeSystem<R, SingleMembers<R>> {
    pub fn single(name: &'static str, journal: &Journal) -> Self {
        Self::with_members(name, journal)
    }
}

impl<R: Requirement, M: Membership + Default> ProbeSystem<R, M> {
    fn with_members(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            members: SharedMembers::default(),
            journal: journal.clone(),
            requirement: PhantomData,
        }
    }

    /// Handle to the membership storage, usable after the system moved into a scene
    pub fn shared(&self) -> SharedMembers<M> {
        Rc::clone(&self.members)
    }
}

impl<R: Requirement, M: Membership> System for ProbeSystem<R, M> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn add(&mut self, id: EntityId, components: Vec<ComponentRef>) {
        self.journal.push(format!("{}:add:{}", self.name, id));
        Membership::insert(&mut self.members, id, components);
    }

    fn remove(&mut self, id: EntityId) {
        if self.members.contains(id) {
            self.journal.push(format!("{}:remove:{}", self.name, id));
        }
        Membership::remove(&mut self.members, id);
    }

    fn init(&mut self, _ctx: &SceneContext<'_>) {
        self.journal.push(format!("{}:init", self.name));
    }

    fn focus(&mut self, _ctx: &SceneContext<'_>) {
        self.journal.push(format!("{}:focus", self.name));
    }

    fn update(&mut self, _delta: Duration) {
        self.journal.push(format!("{}:update", self.name));
    }
}
