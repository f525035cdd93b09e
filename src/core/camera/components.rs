use bevy::prelude::*;
use globekit::orbit::OrbitState;

#[derive(Component, Reflect)]
pub struct MainCamera;

/// Orbit around the globe center; the camera transform is derived from it every frame.
#[derive(Component)]
pub struct OrbitCamera {
    pub orbit: OrbitState,
}
