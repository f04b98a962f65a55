//! Entity implementation

use std::collections::HashMap;
use std::fmt;

use super::component::{Component, ComponentRef, Handle, Kind};

/// Entity identifier
///
/// Assigned by the owning scene on registration, starting at 1. Identifiers
/// are never reused within a scene, even after the entity is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel carried by entities that were never registered with a scene
    pub const UNASSIGNED: Self = Self(0);

    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether a scene has assigned this identifier
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bundle of components with an identity
///
/// Entities are assembled by factories before they are handed to a scene:
///
/// ```rust
/// use ecs_engine::common::{RenderComponent, SpaceComponent};
/// use ecs_engine::ecs::Entity;
///
/// let cube = Entity::new()
///     .with(RenderComponent::new("cube.obj"))
///     .with(SpaceComponent::default());
/// assert!(cube.has("Render"));
/// ```
///
/// Once registered, the scene owns the entity and further component changes
/// go through the scene so that system membership stays consistent.
#[derive(Debug, Default)]
pub struct Entity {
    id: EntityId,
    components: HashMap<Kind, ComponentRef>,
}

impl Entity {
    /// Create an empty, unregistered entity
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a component, replacing any component of the same kind
    #[must_use]
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.insert(component);
        self
    }

    /// Builder: attach an existing component instance
    #[must_use]
    pub fn with_handle<T: Component>(mut self, handle: &Handle<T>) -> Self {
        self.insert_ref(handle.erase());
        self
    }

    /// Add a component and return a typed handle to it
    pub fn insert<T: Component>(&mut self, component: T) -> Handle<T> {
        let handle = Handle::new(component);
        self.insert_ref(handle.erase());
        handle
    }

    /// Scene-assigned identifier, [`EntityId::UNASSIGNED`] before registration
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// All components keyed by kind
    pub fn components(&self) -> &HashMap<Kind, ComponentRef> {
        &self.components
    }

    /// Erased component of the given kind
    pub fn component(&self, kind: Kind) -> Option<&ComponentRef> {
        self.components.get(kind)
    }

    /// Typed handle to the component of type `T`
    pub fn get<T: Component>(&self) -> Option<Handle<T>> {
        self.components
            .get(T::KIND)
            .and_then(|component| component.downcast::<T>())
    }

    /// Whether the entity owns a component of the given kind
    pub fn has(&self, kind: Kind) -> bool {
        self.components.contains_key(kind)
    }

    /// Kinds of all owned components
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.components.keys().copied()
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn insert_ref(&mut self, component: ComponentRef) -> Option<ComponentRef> {
        self.components.insert(component.kind(), component)
    }

    pub(crate) fn remove_ref(&mut self, kind: Kind) -> Option<ComponentRef> {
        self.components.remove(kind)
    }
}
