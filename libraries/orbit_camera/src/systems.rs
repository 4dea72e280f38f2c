use bevy::prelude::*;

use crate::components::{free_transform, tracking_transform, CameraController, OrbitCameraSettings};
use crate::events::{PointerTap, TapSource, TrackingCancelled};
use crate::gesture::{ActiveGestures, PinchGesture, PointerGesture};
use bevy::input::mouse::MouseWheel;
use bevy::window::PrimaryWindow;

#[derive(Default)]
pub(crate) struct BlockedInputs {
    pointer: bool,
}

pub(crate) fn get_blocked_inputs(
    mut egui: bevy_egui::EguiContexts,
    q_window_entities: Query<Entity, With<Window>>,
) -> BlockedInputs {
    let mut ret = BlockedInputs::default();
    for window_entity in &q_window_entities {
        if let Some(ctx) = egui.try_ctx_for_entity_mut(window_entity) {
            ret.pointer |= ctx.wants_pointer_input() || ctx.is_pointer_over_area();
        }
    }
    ret
}

/// Output of the input pass for one camera.
struct InputSink<'a, 'wc, 'wt> {
    settings: &'a OrbitCameraSettings,
    controller: &'a mut CameraController,
    cancelled: &'a mut EventWriter<'wc, TrackingCancelled>,
    taps: &'a mut EventWriter<'wt, PointerTap>,
}

impl InputSink<'_, '_, '_> {
    fn drag(&mut self, gesture: &mut PointerGesture, position: Vec2) {
        if position == gesture.position() {
            return;
        }
        let step = gesture.move_to(position, self.settings.drag_threshold);
        if self.controller.drag(step, self.settings) {
            debug!("Drag cancelled tracking");
            self.cancelled.send(TrackingCancelled);
        }
    }

    fn release(&mut self, gesture: PointerGesture, position: Vec2, source: TapSource) {
        if gesture.is_tap() {
            self.taps.send(PointerTap { position, source });
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn orbit_camera_input(
    In(blocked_inputs): In<BlockedInputs>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut evr_scroll: EventReader<MouseWheel>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut gestures: ResMut<ActiveGestures>,
    mut q_camera: Query<(&OrbitCameraSettings, &mut CameraController)>,
    mut evw_cancelled: EventWriter<TrackingCancelled>,
    mut evw_tap: EventWriter<PointerTap>,
) {
    let Ok((settings, mut controller)) = q_camera.get_single_mut() else {
        evr_scroll.clear();
        return;
    };
    let cursor = q_window
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position());

    let mut sink = InputSink {
        settings,
        controller: &mut *controller,
        cancelled: &mut evw_cancelled,
        taps: &mut evw_tap,
    };

    // Wheel events over the UI scroll the UI, not the camera.
    for ev in evr_scroll.read() {
        if blocked_inputs.pointer {
            continue;
        }
        if ev.y > 0.0 {
            sink.controller.zoom_in(settings);
        } else if ev.y < 0.0 {
            sink.controller.zoom_out(settings);
        }
    }

    mouse_input(
        &blocked_inputs,
        &mouse_buttons,
        cursor,
        &mut gestures,
        &mut sink,
    );
    touch_input(&blocked_inputs, &touches, &mut gestures, &mut sink);
}

fn mouse_input(
    blocked_inputs: &BlockedInputs,
    mouse_buttons: &ButtonInput<MouseButton>,
    cursor: Option<Vec2>,
    gestures: &mut ActiveGestures,
    sink: &mut InputSink,
) {
    if mouse_buttons.just_pressed(MouseButton::Left) {
        gestures.mouse = cursor.map(|position| PointerGesture::start(position, blocked_inputs.pointer));
    }

    if let (Some(gesture), Some(position)) = (gestures.mouse.as_mut(), cursor) {
        if mouse_buttons.pressed(MouseButton::Left) && !gesture.started_over_ui() {
            sink.drag(gesture, position);
        }
    }

    if mouse_buttons.just_released(MouseButton::Left) {
        if let Some(gesture) = gestures.mouse.take() {
            let position = cursor.unwrap_or(gesture.position());
            sink.release(gesture, position, TapSource::Mouse);
        }
    }
}

fn touch_input(
    blocked_inputs: &BlockedInputs,
    touches: &Touches,
    gestures: &mut ActiveGestures,
    sink: &mut InputSink,
) {
    let positions = touches.iter().map(|t| t.position()).collect::<Vec<_>>();
    match positions.as_slice() {
        [] => {
            gestures.pinch = None;
            let released = touches.iter_just_released().next();
            // A finger pressed and lifted within one frame is never seen as held.
            let gesture = gestures.touch.take().or_else(|| {
                let touch = released.filter(|t| touches.just_pressed(t.id()))?;
                let mut gesture = PointerGesture::start(touch.start_position(), blocked_inputs.pointer);
                gesture.move_to(touch.position(), sink.settings.drag_threshold);
                Some(gesture)
            });
            if let Some(gesture) = gesture {
                let position = released.map_or(gesture.position(), |t| t.position());
                sink.release(gesture, position, TapSource::Touch);
            }
        }
        [position] => {
            // Back from a pinch: continue from wherever the remaining finger is.
            if gestures.pinch.take().is_some() {
                if let Some(gesture) = gestures.touch.as_mut() {
                    gesture.reanchor(*position);
                }
            }
            match gestures.touch.as_mut() {
                None => {
                    gestures.touch = Some(PointerGesture::start(*position, blocked_inputs.pointer));
                }
                Some(gesture) if !gesture.started_over_ui() => sink.drag(gesture, *position),
                Some(_) => {}
            }
        }
        [first, second, ..] => {
            let distance = first.distance(*second);
            let gesture = gestures
                .touch
                .get_or_insert_with(|| PointerGesture::start(*first, blocked_inputs.pointer));
            gesture.mark_dragged();
            if gesture.started_over_ui() {
                return;
            }
            match gestures.pinch.as_mut() {
                None => gestures.pinch = Some(PinchGesture::start(distance)),
                Some(pinch) => {
                    if let Some(scale) = pinch.update(distance) {
                        sink.controller.pinch(scale, sink.settings);
                    }
                }
            }
        }
    }
}

pub(crate) fn update_camera_pose(
    mut q_camera: Query<(&OrbitCameraSettings, &mut CameraController, &mut Transform)>,
    q_targets: Query<&Transform, Without<CameraController>>,
    mut evw_cancelled: EventWriter<TrackingCancelled>,
) {
    for (settings, mut controller, mut transform) in &mut q_camera {
        if let Some(tracking) = controller.tracking {
            match q_targets.get(tracking.target) {
                Ok(target) => {
                    *transform = tracking_transform(target.translation, &tracking);
                    continue;
                }
                Err(err) => {
                    warn!("Tracked entity {} is gone ({err}), back to free rotation", tracking.target);
                    controller.release_tracking();
                    evw_cancelled.send(TrackingCancelled);
                }
            }
        }
        controller.damp(settings);
        *transform = free_transform(&controller);
    }
}
