//! Scene setup

use ecs_engine::prelude::*;

use crate::systems::{asteroid, ControlComponent, ControlSystem, RotationSystem, SpinComponent};

fn stock_systems(scene: &mut Scene) {
    scene
        .add_system(CameraSystem::new())
        .add_system(RenderSystem::new())
        .add_system(LightSystem::new())
        .add_system(ControlSystem::new())
        .add_system(RotationSystem::default());
}

fn sun() -> Entity {
    Entity::new()
        .with(SpaceComponent::at(Vec3::new(10.0, 10.0, 10.0)))
        .with(LightComponent {
            strength: 1.5,
            color: Vec3::new(1.0, 0.95, 0.85),
        })
}

/// Asteroid field with a steerable ship
pub fn field() -> Scene {
    let mut scene = Scene::new("field");
    stock_systems(&mut scene);

    scene.add_entities([
        camera_entity(Vec3::new(0.0, 0.0, 12.0)),
        sun(),
        Entity::new()
            .with(ControlComponent::new(4.0))
            .with(SpaceComponent::default().with_size(Vec3::repeat(0.5)))
            .with(RenderComponent::new("assets/models/ship.obj").with_color([0.2, 0.6, 1.0, 1.0])),
    ]);
    scene.add_entities(
        [(-4.0, 2.0), (3.0, -1.5), (5.0, 3.0)]
            .into_iter()
            .map(|(x, y)| asteroid(Vec3::new(x, y, -2.0))),
    );
    scene
}

/// Hangar showing the ship on a turntable
pub fn hangar() -> Scene {
    let mut scene = Scene::new("hangar");
    stock_systems(&mut scene);

    scene.add_entities([
        camera_entity(Vec3::new(0.0, 1.0, 4.0)),
        sun(),
        Entity::new()
            .with(SpaceComponent::default())
            .with(RenderComponent::new("assets/models/ship.obj").with_color([0.2, 0.6, 1.0, 1.0]))
            .with(SpinComponent {
                axis: Vec3::y(),
                speed: 1.2,
            }),
    ]);
    scene
}
