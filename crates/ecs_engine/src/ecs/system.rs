//! System trait and membership storage
//!
//! A system does not inherit its storage. It owns one of the membership
//! helpers below and hands it to the scene through [`System::members`]; the
//! default `add`/`remove`/`contains` implementations delegate to it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use super::component::{ComponentRef, Kind};
use super::entity::EntityId;
use super::requirement::Requirement;
use crate::scene::{SceneContext, SceneError};

/// Storage of the entities a system operates on
pub trait Membership {
    /// Component kinds an entity must own, in supply order
    fn required(&self) -> &'static [Kind];

    /// Store an entity with its matched components, replacing a previous entry
    fn insert(&mut self, id: EntityId, components: Vec<ComponentRef>);

    /// Drop an entity; absent ids are ignored
    fn remove(&mut self, id: EntityId);

    /// Whether the entity is currently a member
    fn contains(&self, id: EntityId) -> bool;

    /// Erased component of a member, looked up by kind
    fn component(&self, id: EntityId, kind: Kind) -> Option<ComponentRef>;

    /// Whether matched components have the types this storage expects
    ///
    /// Storage that does not convert to typed handles accepts everything.
    fn accepts(&self, _components: &[ComponentRef]) -> bool {
        true
    }

    /// Number of members
    fn len(&self) -> usize;

    /// Whether there are no members
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Membership shared with message handlers registered by the system
pub type SharedMembers<M> = Rc<RefCell<M>>;

impl<M: Membership> Membership for Rc<RefCell<M>> {
    fn required(&self) -> &'static [Kind] {
        self.borrow().required()
    }

    fn insert(&mut self, id: EntityId, components: Vec<ComponentRef>) {
        self.borrow_mut().insert(id, components);
    }

    fn remove(&mut self, id: EntityId) {
        self.borrow_mut().remove(id);
    }

    fn contains(&self, id: EntityId) -> bool {
        self.borrow().contains(id)
    }

    fn component(&self, id: EntityId, kind: Kind) -> Option<ComponentRef> {
        self.borrow().component(id, kind)
    }

    fn accepts(&self, components: &[ComponentRef]) -> bool {
        self.borrow().accepts(components)
    }

    fn len(&self) -> usize {
        self.borrow().len()
    }
}

fn typed<R: Requirement>(id: EntityId, components: &[ComponentRef]) -> R {
    R::from_components(components).unwrap_or_else(|| {
        panic!(
            "{}",
            SceneError::RequirementMismatch {
                entity: id,
                required: R::KINDS,
                supplied: components.iter().map(ComponentRef::kind).collect(),
            }
        )
    })
}

fn position(required: &[Kind], kind: Kind) -> Option<usize> {
    required.iter().position(|candidate| *candidate == kind)
}

/// Storage for zero or more entities
pub struct MultiMembers<R: Requirement> {
    entities: BTreeMap<EntityId, R>,
}

impl<R: Requirement> MultiMembers<R> {
    /// Create empty storage
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Components of one member
    pub fn get(&self, id: EntityId) -> Option<&R> {
        self.entities.get(&id)
    }

    /// All members in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &R)> {
        self.entities.iter().map(|(id, components)| (*id, components))
    }

    /// Ids of all members in ascending order
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }
}

impl<R: Requirement> Default for MultiMembers<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Requirement> Membership for MultiMembers<R> {
    fn required(&self) -> &'static [Kind] {
        R::KINDS
    }

    fn insert(&mut self, id: EntityId, components: Vec<ComponentRef>) {
        self.entities.insert(id, typed(id, &components));
    }

    fn remove(&mut self, id: EntityId) {
        self.entities.remove(&id);
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn component(&self, id: EntityId, kind: Kind) -> Option<ComponentRef> {
        let index = position(R::KINDS, kind)?;
        self.entities.get(&id)?.component(index)
    }

    fn accepts(&self, components: &[ComponentRef]) -> bool {
        R::accepts(components)
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}

/// Storage for at most one entity, e.g. a camera or an input focus
///
/// The slot is active while it holds an entity. Adding a second entity replaces
/// the first.
pub struct SingleMembers<R: Requirement> {
    slot: Option<(EntityId, R)>,
}

impl<R: Requirement> SingleMembers<R> {
    /// Create an inactive slot
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Whether an entity currently occupies the slot
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    /// The member and its components
    pub fn get(&self) -> Option<(EntityId, &R)> {
        self.slot.as_ref().map(|(id, components)| (*id, components))
    }

    /// Id of the member
    pub fn id(&self) -> Option<EntityId> {
        self.slot.as_ref().map(|(id, _)| *id)
    }
}

impl<R: Requirement> Default for SingleMembers<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Requirement> Membership for SingleMembers<R> {
    fn required(&self) -> &'static [Kind] {
        R::KINDS
    }

    fn insert(&mut self, id: EntityId, components: Vec<ComponentRef>) {
        if let Some(previous) = self.id().filter(|previous| *previous != id) {
            log::debug!("Single-entity system slot: {} replaces {}", id, previous);
        }
        self.slot = Some((id, typed(id, &components)));
    }

    fn remove(&mut self, id: EntityId) {
        if self.id() == Some(id) {
            self.slot = None;
        }
    }

    fn contains(&self, id: EntityId) -> bool {
        self.id() == Some(id)
    }

    fn component(&self, id: EntityId, kind: Kind) -> Option<ComponentRef> {
        let index = position(R::KINDS, kind)?;
        match &self.slot {
            Some((member, components)) if *member == id => components.component(index),
            _ => None,
        }
    }

    fn accepts(&self, components: &[ComponentRef]) -> bool {
        R::accepts(components)
    }

    fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }
}

/// Behavioural module operating on the entities that satisfy its requirements
///
/// Implementors provide a name, their membership storage, and the per-frame
/// update. Everything else has a default.
pub trait System {
    /// Human-readable name, used in logs
    fn name(&self) -> &'static str;

    /// Membership storage
    fn members(&self) -> &dyn Membership;

    /// Mutable membership storage
    fn members_mut(&mut self) -> &mut dyn Membership;

    /// Required component kinds, in supply order
    fn required(&self) -> &'static [Kind] {
        self.members().required()
    }

    /// Wire an entity in, with components in [`System::required`] order
    fn add(&mut self, id: EntityId, components: Vec<ComponentRef>) {
        self.members_mut().insert(id, components);
    }

    /// Unwire an entity; absent ids are ignored
    fn remove(&mut self, id: EntityId) {
        self.members_mut().remove(id);
    }

    /// Whether matched components have the types the system expects
    fn accepts(&self, components: &[ComponentRef]) -> bool {
        self.members().accepts(components)
    }

    /// Whether the entity is wired into this system
    fn contains(&self, id: EntityId) -> bool {
        self.members().contains(id)
    }

    /// Component of a member, looked up by kind
    ///
    /// Prefer the typed handles from the membership storage inside `update`.
    fn component(&self, id: EntityId, kind: Kind) -> Option<ComponentRef> {
        self.members().component(id, kind)
    }

    /// Called once, before the first wiring pass of the owning scene
    fn init(&mut self, _ctx: &SceneContext<'_>) {}

    /// Called every time the owning scene becomes the active one
    ///
    /// The mailbox is fresh on every focus, so listeners belong here.
    fn focus(&mut self, _ctx: &SceneContext<'_>) {}

    /// Called every frame with the time since the previous frame
    fn update(&mut self, delta: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, Handle};

    struct CameraComponent;
    impl Component for CameraComponent {
        const KIND: Kind = "Camera";
    }

    struct SpaceComponent(i32);
    impl Component for SpaceComponent {
        const KIND: Kind = "Space";
    }

    type Viewpoint = (Handle<CameraComponent>, Handle<SpaceComponent>);

    fn supply(offset: i32) -> Vec<ComponentRef> {
        vec![
            ComponentRef::new(CameraComponent),
            ComponentRef::new(SpaceComponent(offset)),
        ]
    }

    #[test]
    fn test_multi_members_insert_and_remove() {
        let mut members = MultiMembers::<Viewpoint>::new();
        members.insert(EntityId::new(2), supply(2));
        members.insert(EntityId::new(1), supply(1));

        assert_eq!(members.len(), 2);
        assert_eq!(members.ids().collect::<Vec<_>>(), [EntityId::new(1), EntityId::new(2)]);

        members.remove(EntityId::new(1));
        members.remove(EntityId::new(1));
        members.remove(EntityId::new(99));

        assert_eq!(members.len(), 1);
        assert!(members.contains(EntityId::new(2)));
    }

    #[test]
    fn test_component_lookup_by_kind() {
        let mut members = MultiMembers::<Viewpoint>::new();
        members.insert(EntityId::new(1), supply(5));

        let space = members.component(EntityId::new(1), "Space").unwrap();
        assert_eq!(space.downcast::<SpaceComponent>().unwrap().borrow().0, 5);
        assert!(members.component(EntityId::new(1), "Render").is_none());
        assert!(members.component(EntityId::new(2), "Space").is_none());
    }

    #[test]
    fn test_single_members_ignores_foreign_remove() {
        let mut members = SingleMembers::<Viewpoint>::new();
        assert!(!members.is_active());

        members.insert(EntityId::new(3), supply(3));
        members.remove(EntityId::new(4));
        assert!(members.is_active());
        assert_eq!(members.id(), Some(EntityId::new(3)));

        members.remove(EntityId::new(3));
        assert!(!members.is_active());
        assert_eq!(members.len(), 0);
    }

    #[test]
    fn test_single_members_last_insert_wins() {
        let mut members = SingleMembers::<Viewpoint>::new();
        members.insert(EntityId::new(1), supply(1));
        members.insert(EntityId::new(2), supply(2));

        let (id, (_, space)) = members.get().unwrap();
        assert_eq!(id, EntityId::new(2));
        assert_eq!(space.borrow().0, 2);
        assert!(!members.contains(EntityId::new(1)));
    }

    #[test]
    fn test_shared_members_delegate() {
        let shared: SharedMembers<MultiMembers<Viewpoint>> = Rc::default();
        let mut storage = Rc::clone(&shared);

        storage.insert(EntityId::new(1), supply(1));

        assert_eq!(shared.borrow().len(), 1);
        assert_eq!(Membership::required(&storage), &["Camera", "Space"]);
    }

    #[test]
    #[should_panic(expected = "do not match")]
    fn test_mismatched_supply_panics() {
        let mut members = MultiMembers::<Viewpoint>::new();
        members.insert(EntityId::new(1), supply(1).into_iter().rev().collect());
    }
}
