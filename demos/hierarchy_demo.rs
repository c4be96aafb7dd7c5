//! A small solar system: a sun, an orbiting planet and its moon.
//!
//! Run with `RUST_LOG=debug cargo run --example hierarchy_demo`. An optional
//! first argument names a TOML file with `WorldConfig` settings.

use std::f32::consts::TAU;

use rcube::ecs::{Entity, World, WorldConfig};
use rcube::math::{Quat, Vec3};
use rcube::{HierarchyExt, Name, PointLight, Transform, TransformSystem};

fn spawn(world: &mut World, name: &str, transform: Transform) -> Result<Entity, Box<dyn std::error::Error>> {
    let entity = world.spawn().with(transform)?.with(Name::new(name))?.id();
    Ok(entity)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    log::info!("starting with {:?}", config);

    let mut world = World::with_config(&config);
    world.add_system(Box::new(TransformSystem::new()))?;

    let sun = spawn(&mut world, "sun", Transform::new())?;
    world.add_component(sun, PointLight::new(Vec3::new(1.0, 0.9, 0.7), 100.0))?;
    let planet = spawn(&mut world, "planet", Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))?;
    let moon = spawn(
        &mut world,
        "moon",
        Transform::from_position(Vec3::new(2.0, 0.0, 0.0)).with_scale(Vec3::splat(0.25)),
    )?;
    world.set_parent(planet, sun)?;
    world.set_parent(moon, planet)?;

    let frames = 8;
    let step = Quat::from_axis_angle(Vec3::Y, TAU / frames as f32);
    for _ in 0..frames {
        world.get_component_mut::<Transform>(sun)?.rotate(step);
        world.get_component_mut::<Transform>(planet)?.rotate(step);
        world.update(1.0 / 60.0)?;

        for entity in [planet, moon] {
            let name = world.get_component::<Name>(entity)?;
            let position = world.get_component::<Transform>(entity)?.world_position();
            println!(
                "frame {:>2} {:<6} ({:>6.2}, {:>6.2}, {:>6.2})",
                world.frame_count(),
                name,
                position.x(),
                position.y(),
                position.z()
            );
        }
    }

    let removed = world.destroy_recursive(sun);
    log::info!("tore down {} entities, {} left", removed, world.entity_count());
    Ok(())
}
