use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use super::panel::UiInputCaptureRes;

/// Point on the ground the camera orbits around.
#[derive(Component)]
pub struct Viewer;

#[derive(Component)]
pub struct OrbitCamera;

#[derive(Resource, Clone)]
pub struct OrbitCameraSettings {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_speed: f32,
    pub drag_pan_sensitivity: f32,
    pub drag_orbit_sensitivity: f32,
}

impl Default for OrbitCameraSettings {
    fn default() -> Self {
        // Sized for the default 1000-unit terrain.
        Self {
            yaw: 0.8,
            pitch: 0.75,
            distance: 1400.0,
            min_distance: 20.0,
            max_distance: 6000.0,
            zoom_speed: 0.12,
            drag_pan_sensitivity: 1.5,
            drag_orbit_sensitivity: 0.005,
        }
    }
}

pub fn setup_viewer(mut commands: Commands) {
    commands.spawn((Viewer, Transform::default()));
    commands.spawn((OrbitCamera, Camera3d::default(), Transform::default()));
}

/// Wheel zooms, right drag orbits, middle drag pans the focus across the ground.
pub fn orbit_camera_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut settings: ResMut<OrbitCameraSettings>,
    mut q_focus: Query<&mut Transform, With<Viewer>>,
    ui_capture: Res<UiInputCaptureRes>,
) {
    let scroll: f32 = mouse_wheel.read().map(|ev| ev.y).sum();
    let drag: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    if ui_capture.pointer {
        return;
    }
    let Ok(mut focus) = q_focus.single_mut() else {
        return;
    };

    if scroll != 0.0 {
        let factor = (1.0 - scroll * settings.zoom_speed).clamp(0.2, 5.0);
        settings.distance =
            (settings.distance * factor).clamp(settings.min_distance, settings.max_distance);
    }
    if drag == Vec2::ZERO {
        return;
    }

    if mouse_buttons.pressed(MouseButton::Right) {
        settings.yaw -= drag.x * settings.drag_orbit_sensitivity;
        settings.pitch =
            (settings.pitch + drag.y * settings.drag_orbit_sensitivity).clamp(0.05, 1.5);
    }

    // Scaled with zoom so the ground tracks the cursor.
    if mouse_buttons.pressed(MouseButton::Middle) {
        let yaw = Quat::from_rotation_y(settings.yaw);
        let scale = settings.drag_pan_sensitivity * settings.distance / 1400.0;
        let delta = (yaw * Vec3::Z * drag.y - yaw * Vec3::X * drag.x) * scale;
        focus.translation += Vec3::new(delta.x, 0.0, delta.z);
    }
}

pub fn update_orbit_camera(
    settings: Res<OrbitCameraSettings>,
    q_focus: Query<&Transform, (With<Viewer>, Without<OrbitCamera>)>,
    mut q_cam: Query<&mut Transform, (With<OrbitCamera>, Without<Viewer>)>,
) {
    let (Ok(focus), Ok(mut cam)) = (q_focus.single(), q_cam.single_mut()) else {
        return;
    };
    let focus = focus.translation;

    let rot = Quat::from_euler(EulerRot::YXZ, settings.yaw, settings.pitch, 0.0);
    let offset = rot * Vec3::new(0.0, 0.0, -settings.distance);
    cam.translation = focus + offset;
    cam.look_at(focus, Vec3::Y);
}
