//! Game-side components and systems

use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use ecs_engine::prelude::*;

/// Marks the entity steered by the player
#[derive(Debug)]
pub struct ControlComponent {
    /// Units per second
    pub speed: f32,
    held: BTreeSet<i32>,
}

impl Component for ControlComponent {
    const KIND: Kind = "Control";
}

impl ControlComponent {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            held: BTreeSet::new(),
        }
    }

    /// Unit-length steering direction from the held arrow/WASD keys
    pub fn direction(&self) -> Vec3 {
        let mut direction = Vec3::zeros();
        for key in &self.held {
            direction += match *key {
                keys::W | keys::UP => Vec3::y(),
                keys::S | keys::DOWN => -Vec3::y(),
                keys::A | keys::LEFT => -Vec3::x(),
                keys::D | keys::RIGHT => Vec3::x(),
                _ => Vec3::zeros(),
            };
        }
        direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
    }

    fn steer(&mut self, key: &KeyboardMessage) {
        if key.pressed {
            self.held.insert(key.key);
        } else {
            self.held.remove(&key.key);
        }
    }
}

/// Constant spin around an axis
#[derive(Debug, Clone, Copy)]
pub struct SpinComponent {
    pub axis: Vec3,
    /// Radians per second
    pub speed: f32,
}

impl Component for SpinComponent {
    const KIND: Kind = "Spin";
}

type Controlled = (Handle<ControlComponent>, Handle<SpaceComponent>);

/// Player input: steering, scrolling, spawning, and scene/quit keys
///
/// Works without a controlled entity; the scene and quit keys are always live.
#[derive(Default)]
pub struct ControlSystem {
    members: SharedMembers<SingleMembers<Controlled>>,
}

impl ControlSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for ControlSystem {
    fn name(&self) -> &'static str {
        "Control"
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn focus(&mut self, ctx: &SceneContext<'_>) {
        let members = Rc::clone(&self.members);
        ctx.mailbox.listen(move |key: &KeyboardMessage, scene: &mut Scene| {
            match key.key {
                keys::TAB if key.pressed => scene.send(&ChangeSceneMessage::relative(1)),
                keys::ESCAPE if key.pressed => scene.send(&QuitMessage),
                _ => {
                    if let Some((_, (control, _))) = members.borrow().get() {
                        control.borrow_mut().steer(key);
                    }
                }
            }
        });

        let members = Rc::clone(&self.members);
        ctx.mailbox.listen(move |scroll: &MouseScrollMessage, _| {
            if let Some((_, (_, space))) = members.borrow().get() {
                #[allow(clippy::cast_possible_truncation)]
                let step = scroll.y as f32 * 0.5;
                space.borrow_mut().translate(Vec3::z() * step);
            }
        });

        ctx.mailbox.listen(|click: &MouseButtonMessage, scene: &mut Scene| {
            if click.pressed && click.button == 0 {
                #[allow(clippy::cast_possible_truncation)]
                let position = Vec3::new(click.x as f32 * 4.0, click.y as f32 * 4.0, 0.0);
                let id = scene.add_entity(asteroid(position));
                log::info!("Spawned asteroid {} at {:?}", id, position);
            }
        });
    }

    fn update(&mut self, delta: Duration) {
        let members = self.members.borrow();
        let Some((_, (control, space))) = members.get() else {
            return;
        };
        let control = control.borrow();
        space
            .borrow_mut()
            .translate(control.direction() * control.speed * delta.as_secs_f32());
    }
}

type Spinning = (Handle<SpaceComponent>, Handle<SpinComponent>);

/// Applies [`SpinComponent`]s
#[derive(Default)]
pub struct RotationSystem {
    members: MultiMembers<Spinning>,
}

impl System for RotationSystem {
    fn name(&self) -> &'static str {
        "Rotation"
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn update(&mut self, delta: Duration) {
        for (_, (space, spin)) in self.members.iter() {
            let spin = spin.borrow();
            space.borrow_mut().rotate(spin.axis, spin.speed * delta.as_secs_f32());
        }
    }
}

/// Spinning rock prefab
pub fn asteroid(position: Vec3) -> Entity {
    Entity::new()
        .with(SpaceComponent::at(position))
        .with(RenderComponent::new("assets/models/asteroid.obj").with_color([0.6, 0.55, 0.5, 1.0]))
        .with(SpinComponent {
            axis: Vec3::new(0.3, 1.0, 0.2),
            speed: 0.8,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: i32, pressed: bool) -> KeyboardMessage {
        KeyboardMessage {
            key,
            scancode: 0,
            pressed,
            modifiers: Modifiers::empty(),
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_held_keys_steer() {
        let mut control = ControlComponent::new(2.0);
        control.steer(&press(keys::W, true));
        assert_eq!(control.direction(), Vec3::y());

        control.steer(&press(keys::W, true));
        control.steer(&press(keys::UP, true));
        control.steer(&press(keys::S, true));
        control.steer(&press(keys::UP, false));
        assert_eq!(control.direction(), Vec3::zeros());

        control.steer(&press(keys::S, false));
        control.steer(&press(keys::W, false));
        control.steer(&press(keys::D, true));
        assert_eq!(control.direction(), Vec3::x());
    }

    #[test]
    fn test_tab_requests_next_scene() {
        let mut window = Window::new(WindowArgs::default(), HeadlessBackend::new());
        window.add_scenes([
            Scene::new("one").with_system(ControlSystem::new()),
            Scene::new("two").with_system(ControlSystem::new()),
        ]);
        window.start().unwrap();
        window.backend_mut().push_frame(vec![RawEvent::Key {
            key: keys::TAB,
            scancode: 15,
            pressed: true,
            modifiers: Modifiers::empty(),
            timestamp: 0.0,
        }]);

        window.frame();

        assert_eq!(window.current(), Some(1));
    }

    #[test]
    fn test_click_spawns_spinning_asteroid() {
        let mut window = Window::new(WindowArgs::default(), HeadlessBackend::new());
        window.add_scene(
            Scene::new("field")
                .with_system(ControlSystem::new())
                .with_system(RotationSystem::default()),
        );
        window.start().unwrap();
        window.backend_mut().push_frame(vec![RawEvent::MouseButton {
            button: 0,
            pressed: true,
            x: 400.0,
            y: 400.0,
            timestamp: 0.0,
        }]);

        window.frame();

        let scene = window.scene(0).unwrap();
        assert_eq!(scene.entity_count(), 1);
        let id = scene.entities()[0].id();
        assert_eq!(scene.memberships(id), ["Rotation"]);
    }

    #[test]
    fn test_controlled_entity_moves() {
        let mut scene = Scene::new("moving").with_system(ControlSystem::new());
        let id = scene.add_entity(
            Entity::new()
                .with(ControlComponent::new(2.0))
                .with(SpaceComponent::default()),
        );
        scene.init(&WindowArgs::default(), MailBox::new());
        scene.send(&press(keys::D, true));

        scene.update(Duration::from_millis(500));

        let space = scene.component::<SpaceComponent>(id).unwrap();
        assert_eq!(space.borrow().position(), Vec3::new(1.0, 0.0, 0.0));
    }
}
