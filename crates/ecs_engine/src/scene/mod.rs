//! Scene: entities, systems, and the wiring between them
//!
//! ## Lifecycle
//!
//! ```text
//! Scene::new ──add_entity/add_system──▶ (uninitialized)
//!      │
//!      ▼ init (first time)
//! system.init for all ▶ wire every entity into every matching system ▶ focus
//!      │
//!      ▼ init (again, after a scene switch)
//! focus only
//! ```
//!
//! After the first `init` every mutation rewires incrementally: a new entity
//! is matched against all systems, a new component is matched against the
//! systems that do not hold the entity yet (and handed to the holders that
//! require its kind when it replaces one), and a removed component unwires
//! the entity from the systems that required it before the component is gone.

mod error;

pub use error::SceneError;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::ecs::{find_duplicate, match_components, Component, ComponentRef, Entity, EntityId, Handle, Kind, System};
use crate::events::{MailBox, Message};
use crate::window::WindowArgs;

/// What a system can see of its scene during `init` and `focus`
pub struct SceneContext<'a> {
    /// Name of the scene
    pub scene: &'a str,
    /// Arguments the window was created with
    pub args: &'a WindowArgs,
    /// Bus of the current focus session
    pub mailbox: &'a MailBox,
}

/// A set of entities and the systems that operate on them
pub struct Scene {
    name: String,
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    systems: Vec<Box<dyn System>>,
    id_counter: u64,
    initialized: bool,
    focused: bool,
    args: WindowArgs,
    mailbox: MailBox,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            index: HashMap::new(),
            systems: Vec::new(),
            id_counter: 0,
            initialized: false,
            focused: false,
            args: WindowArgs::default(),
            mailbox: MailBox::new(),
        }
    }

    /// Builder: register an entity
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }

    /// Builder: register a system
    ///
    /// # Panics
    /// Panics if the system lists a component kind twice.
    #[must_use]
    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.add_system(system);
        self
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an entity and return its freshly assigned id
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        self.id_counter += 1;
        let id = EntityId::new(self.id_counter);
        entity.set_id(id);

        if self.initialized {
            for system in &mut self.systems {
                wire(system.as_mut(), &entity);
            }
        }

        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        log::trace!("Scene '{}': added entity {}", self.name, id);
        id
    }

    /// Register several entities, in order
    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityId> {
        entities.into_iter().map(|entity| self.add_entity(entity)).collect()
    }

    /// Unregister an entity and unwire it from every system
    ///
    /// Returns the entity, or `None` if no entity has this id.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let Some(position) = self.index.remove(&id) else {
            log::trace!("Scene '{}': remove of unknown entity {}", self.name, id);
            return None;
        };

        let mut entity = self.entities.swap_remove(position);
        if let Some(moved) = self.entities.get(position) {
            self.index.insert(moved.id(), position);
        }

        for system in &mut self.systems {
            system.remove(id);
        }

        entity.set_id(EntityId::UNASSIGNED);
        log::trace!("Scene '{}': removed entity {}", self.name, id);
        Some(entity)
    }

    /// Add a component to a registered entity, replacing one of the same kind
    ///
    /// Systems that hold the entity and require that kind are handed the new
    /// instance. Every system that does not hold the entity yet is offered it
    /// again.
    ///
    /// # Panics
    /// Panics if no entity has this id.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> Handle<T> {
        self.try_add_component(id, component)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Fallible version of [`Scene::add_component`]
    pub fn try_add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<Handle<T>, SceneError> {
        let handle = Handle::new(component);
        self.try_attach(id, handle.erase())?;
        Ok(handle)
    }

    /// Attach an existing component instance to a registered entity
    ///
    /// # Panics
    /// Panics if no entity has this id.
    pub fn attach<T: Component>(&mut self, id: EntityId, handle: &Handle<T>) {
        self.try_attach(id, handle.erase())
            .unwrap_or_else(|error| panic!("{error}"));
    }

    fn try_attach(&mut self, id: EntityId, component: ComponentRef) -> Result<(), SceneError> {
        let position = *self.index.get(&id).ok_or(SceneError::MissingEntity(id))?;
        let entity = &mut self.entities[position];

        let kind = component.kind();
        let replaced = entity.insert_ref(component).is_some();
        if replaced {
            log::trace!("Scene '{}': replaced '{}' on entity {}", self.name, kind, id);
        }

        if self.initialized {
            for system in &mut self.systems {
                if replaced && system.contains(id) && system.required().contains(&kind) {
                    rewire(system.as_mut(), entity);
                } else {
                    wire(system.as_mut(), entity);
                }
            }
        }
        Ok(())
    }

    /// Remove a component from a registered entity
    ///
    /// Every system that requires the kind and holds the entity loses the
    /// entity first, while the component is still present. Unknown ids and
    /// kinds are ignored.
    pub fn remove_component(&mut self, id: EntityId, kind: Kind) -> Option<ComponentRef> {
        let Some(&position) = self.index.get(&id) else {
            log::trace!("Scene '{}': remove '{}' from unknown entity {}", self.name, kind, id);
            return None;
        };
        if !self.entities[position].has(kind) {
            return None;
        }

        for system in &mut self.systems {
            if system.required().contains(&kind) && system.contains(id) {
                log::trace!("Scene '{}': unwiring entity {} from {}", self.name, id, system.name());
                system.remove(id);
            }
        }

        self.entities[position].remove_ref(kind)
    }

    /// Register a system
    ///
    /// On an initialized scene the system is initialized and wired right away,
    /// and focused too if the scene is the active one.
    ///
    /// # Panics
    /// Panics if the system lists a component kind twice.
    pub fn add_system(&mut self, system: impl System + 'static) -> &mut Self {
        self.add_boxed_system(Box::new(system))
    }

    /// Register a boxed system, see [`Scene::add_system`]
    ///
    /// # Panics
    /// Panics if the system lists a component kind twice.
    pub fn add_boxed_system(&mut self, system: Box<dyn System>) -> &mut Self {
        if let Err(error) = self.try_add_boxed_system(system) {
            panic!("{error}");
        }
        self
    }

    /// Register several systems, in order
    ///
    /// # Panics
    /// Panics if any system lists a component kind twice.
    pub fn add_systems(&mut self, systems: impl IntoIterator<Item = Box<dyn System>>) -> &mut Self {
        for system in systems {
            self.add_boxed_system(system);
        }
        self
    }

    /// Fallible version of [`Scene::add_boxed_system`]
    pub fn try_add_boxed_system(&mut self, mut system: Box<dyn System>) -> Result<(), SceneError> {
        if let Some(kind) = find_duplicate(system.required()) {
            return Err(SceneError::DuplicateRequirement {
                system: system.name(),
                kind,
            });
        }

        if self.initialized {
            let ctx = SceneContext {
                scene: &self.name,
                args: &self.args,
                mailbox: &self.mailbox,
            };
            system.init(&ctx);
            for entity in &self.entities {
                wire(system.as_mut(), entity);
            }
            if self.focused {
                system.focus(&ctx);
            }
        }

        log::debug!("Scene '{}': added system {}", self.name, system.name());
        self.systems.push(system);
        Ok(())
    }

    /// Initialize the scene for display
    ///
    /// The first call initializes every system and wires every registered
    /// entity. Every call, first or not, focuses every system against the
    /// given mailbox.
    pub fn init(&mut self, args: &WindowArgs, mailbox: MailBox) {
        self.args = args.clone();
        self.mailbox = mailbox;

        let ctx = SceneContext {
            scene: &self.name,
            args: &self.args,
            mailbox: &self.mailbox,
        };

        if !self.initialized {
            for system in &mut self.systems {
                system.init(&ctx);
            }
            for system in &mut self.systems {
                for entity in &self.entities {
                    wire(system.as_mut(), entity);
                }
            }
            self.initialized = true;
            log::debug!(
                "Scene '{}': initialized {} systems with {} entities",
                self.name,
                self.systems.len(),
                self.entities.len()
            );
        }

        for system in &mut self.systems {
            system.focus(&ctx);
        }
        self.focused = true;
    }

    /// Detach from the window's mailbox when another scene takes over
    pub(crate) fn blur(&mut self) {
        self.focused = false;
        self.mailbox = MailBox::new();
    }

    /// Update every system, in registration order
    pub fn update(&mut self, delta: Duration) {
        for system in &mut self.systems {
            system.update(delta);
        }
    }

    /// Send a message through the scene's mailbox
    ///
    /// Handlers receive this scene and may mutate it.
    pub fn send<M: Message>(&mut self, message: &M) {
        let mailbox = self.mailbox.clone();
        mailbox.send(message, self);
    }

    /// Queue a message for [`Scene::dispatch_posted`]
    pub fn post<M: Message>(&self, message: M) {
        self.mailbox.post(message);
    }

    /// Deliver every message posted so far
    ///
    /// Messages posted while these are delivered wait for the next call.
    pub fn dispatch_posted(&mut self) -> usize {
        let mailbox = self.mailbox.clone();
        mailbox.deliver_posted(self)
    }

    /// Mailbox of the current focus session
    pub fn mailbox(&self) -> &MailBox {
        &self.mailbox
    }

    /// Arguments of the window the scene was last initialized by
    pub fn args(&self) -> &WindowArgs {
        &self.args
    }

    /// Registered entity by id
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&position| &self.entities[position])
    }

    /// Typed handle to a component of a registered entity
    pub fn component<T: Component>(&self, id: EntityId) -> Option<Handle<T>> {
        self.entity(id)?.get::<T>()
    }

    /// All registered entities
    ///
    /// Order is not stable across removals.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All systems, in registration order
    pub fn systems(&self) -> impl Iterator<Item = &(dyn System + 'static)> {
        self.systems.iter().map(Box::as_ref)
    }

    /// Names of the systems currently holding an entity
    pub fn memberships(&self, id: EntityId) -> Vec<&'static str> {
        self.systems
            .iter()
            .filter(|system| system.contains(id))
            .map(|system| system.name())
            .collect()
    }

    /// Whether [`Scene::init`] has run at least once
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the scene is the one the window currently displays
    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("systems", &self.systems.iter().map(|system| system.name()).collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .field("focused", &self.focused)
            .finish()
    }
}

/// Components of `entity` in the order `system` requires them
///
/// Kinds are matched by name; an entity whose component under a required
/// name is a different type does not match.
fn matching(system: &dyn System, entity: &Entity) -> Option<Vec<ComponentRef>> {
    let components = match_components(system.required(), entity.components())?;
    if system.accepts(&components) {
        Some(components)
    } else {
        log::warn!(
            "Entity {} owns the kinds {} requires, but not the component types it expects",
            entity.id(),
            system.name()
        );
        None
    }
}

fn wire(system: &mut dyn System, entity: &Entity) {
    if system.contains(entity.id()) {
        return;
    }
    if let Some(components) = matching(system, entity) {
        log::trace!("Wiring entity {} into {}", entity.id(), system.name());
        system.add(entity.id(), components);
    }
}

/// Hand a member its current components again, after one was replaced
fn rewire(system: &mut dyn System, entity: &Entity) {
    match matching(system, entity) {
        Some(components) => {
            log::trace!("Rewiring entity {} into {}", entity.id(), system.name());
            system.add(entity.id(), components);
        }
        None => system.remove(entity.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{Journal, ProbeSystem, ShipComponent, ThrustComponent};

    type Ships = (Handle<ShipComponent>,);
    type Engines = (Handle<ShipComponent>, Handle<ThrustComponent>);

    #[test]
    fn test_ids_start_at_one_and_never_repeat() {
        let mut scene = Scene::new("ids");
        let first = scene.add_entity(Entity::new());
        let second = scene.add_entity(Entity::new());
        scene.remove_entity(second);
        let third = scene.add_entity(Entity::new());

        assert_eq!(first.raw(), 1);
        assert_eq!(second.raw(), 2);
        assert_eq!(third.raw(), 3);
    }

    #[test]
    fn test_remove_entity_keeps_index_consistent() {
        let mut scene = Scene::new("index");
        let ids = scene.add_entities((0..4).map(|_| Entity::new()));

        let removed = scene.remove_entity(ids[0]).unwrap();
        assert_eq!(removed.id(), EntityId::UNASSIGNED);

        for id in &ids[1..] {
            assert_eq!(scene.entity(*id).unwrap().id(), *id);
        }
        assert!(scene.entity(ids[0]).is_none());
        assert!(scene.remove_entity(ids[0]).is_none());
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn test_no_wiring_before_init() {
        let journal = Journal::default();
        let mut scene = Scene::new("lazy").with_system(ProbeSystem::<Ships>::new("ships", &journal));
        let id = scene.add_entity(Entity::new().with(ShipComponent::default()));

        assert!(scene.memberships(id).is_empty());

        scene.init(&WindowArgs::default(), MailBox::new());
        assert_eq!(scene.memberships(id), ["ships"]);
    }

    #[test]
    fn test_add_component_wires_new_matches() {
        let journal = Journal::default();
        let mut scene = Scene::new("grow").with_system(ProbeSystem::<Engines>::new("engines", &journal));
        scene.init(&WindowArgs::default(), MailBox::new());

        let id = scene.add_entity(Entity::new().with(ShipComponent::default()));
        assert!(scene.memberships(id).is_empty());

        scene.add_component(id, ThrustComponent(2.0));
        assert_eq!(scene.memberships(id), ["engines"]);
    }

    #[test]
    fn test_remove_component_unwires_dependents_only() {
        let journal = Journal::default();
        let mut scene = Scene::new("shrink")
            .with_system(ProbeSystem::<Ships>::new("ships", &journal))
            .with_system(ProbeSystem::<Engines>::new("engines", &journal));
        let id = scene.add_entity(
            Entity::new()
                .with(ShipComponent::default())
                .with(ThrustComponent(1.0)),
        );
        scene.init(&WindowArgs::default(), MailBox::new());

        let removed = scene.remove_component(id, "Thrust");

        assert!(removed.is_some());
        assert_eq!(scene.memberships(id), ["ships"]);
        assert!(!scene.entity(id).unwrap().has("Thrust"));
        assert!(scene.remove_component(id, "Thrust").is_none());
    }

    #[test]
    fn test_missing_entity_errors() {
        let mut scene = Scene::new("missing");
        let ghost = EntityId::new(9);

        let result = scene.try_add_component(ghost, ShipComponent::default());

        assert_eq!(result.unwrap_err(), SceneError::MissingEntity(ghost));
        assert!(scene.remove_component(ghost, "Ship").is_none());
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_add_component_to_missing_entity_panics() {
        let mut scene = Scene::new("missing");
        scene.add_component(EntityId::new(1), ShipComponent::default());
    }

    #[test]
    fn test_duplicate_requirement_rejected() {
        type Twice = (Handle<ShipComponent>, Handle<ShipComponent>);
        let journal = Journal::default();
        let mut scene = Scene::new("dupes");

        let result = scene.try_add_boxed_system(Box::new(ProbeSystem::<Twice>::new("twice", &journal)));

        assert_eq!(
            result.unwrap_err(),
            SceneError::DuplicateRequirement {
                system: "twice",
                kind: "Ship"
            }
        );
        assert_eq!(scene.systems().count(), 0);
    }

    #[test]
    fn test_system_added_after_init_is_wired_and_focused() {
        let journal = Journal::default();
        let mut scene = Scene::new("late");
        let id = scene.add_entity(Entity::new().with(ShipComponent::default()));
        scene.init(&WindowArgs::default(), MailBox::new());

        scene.add_system(ProbeSystem::<Ships>::new("ships", &journal));

        assert_eq!(scene.memberships(id), ["ships"]);
        assert_eq!(journal.entries(), ["ships:init", format!("ships:add:{id}").as_str(), "ships:focus"]);
    }

    #[test]
    fn test_send_reaches_scene_handlers() {
        struct Spawn;
        impl Message for Spawn {
            const KIND: crate::events::MessageKind = "Spawn";
        }

        let mut scene = Scene::new("bus");
        let mailbox = MailBox::new();
        mailbox.listen(|_: &Spawn, scene: &mut Scene| {
            scene.add_entity(Entity::new());
        });
        scene.init(&WindowArgs::default(), mailbox);

        scene.send(&Spawn);
        scene.post(Spawn);
        assert_eq!(scene.entity_count(), 1);

        assert_eq!(scene.dispatch_posted(), 1);
        assert_eq!(scene.entity_count(), 2);
    }
}
