use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};

use crate::{
    constants::world::CAMERA_FOLLOW_RATE,
    systems::{components::Position, player::Player},
    terrain::Terrain,
};

/// Smoothed vertical camera position handed to the renderer.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow {
    pub y: f32,
}

impl CameraFollow {
    /// A camera resting on the ground line.
    pub fn new(terrain: &Terrain) -> Self {
        Self {
            y: terrain.ground_offset(),
        }
    }
}

pub fn camera_follow_system(
    terrain: Res<Terrain>,
    players: Query<&Position, With<Player>>,
    mut camera: ResMut<CameraFollow>,
) {
    let Ok(position) = players.single() else {
        return;
    };
    let target = terrain.ground_offset() + position.0.y;
    camera.y += (target - camera.y) * CAMERA_FOLLOW_RATE;
}
