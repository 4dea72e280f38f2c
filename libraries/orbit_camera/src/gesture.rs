use bevy::prelude::*;

/// One pointer move: the motion since the previous move, and whether the gesture is a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub delta: Vec2,
    pub is_drag: bool,
}

/// A single pointer (mouse button or finger) from press to release.
///
/// The gesture becomes a drag once the pointer is further than the threshold from where it was
/// pressed, on either axis. It stays a drag until released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGesture {
    origin: Vec2,
    last: Vec2,
    dragged: bool,
    over_ui: bool,
}

impl PointerGesture {
    pub fn start(position: Vec2, over_ui: bool) -> Self {
        Self {
            origin: position,
            last: position,
            dragged: false,
            over_ui,
        }
    }

    pub fn move_to(&mut self, position: Vec2, threshold: f32) -> DragStep {
        let delta = position - self.last;
        self.last = position;
        let travel = (position - self.origin).abs();
        if travel.x > threshold || travel.y > threshold {
            self.dragged = true;
        }
        DragStep {
            delta,
            is_drag: self.dragged,
        }
    }

    /// Continue from `position` without producing motion, e.g. when a second finger lifts.
    pub fn reanchor(&mut self, position: Vec2) {
        self.last = position;
    }

    pub fn mark_dragged(&mut self) {
        self.dragged = true;
    }

    #[inline]
    pub fn is_drag(&self) -> bool {
        self.dragged
    }

    #[inline]
    pub fn started_over_ui(&self) -> bool {
        self.over_ui
    }

    /// Released without dragging, and not started over the UI.
    #[inline]
    pub fn is_tap(&self) -> bool {
        !self.dragged && !self.over_ui
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.last
    }
}

/// Two-finger pinch. Each update is compared with the previous finger distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    previous: f32,
}

impl PinchGesture {
    pub fn start(distance: f32) -> Self {
        Self { previous: distance }
    }

    /// Ratio of the new finger distance to the previous one. A zero previous distance yields
    /// `None`, meaning no scale change.
    pub fn update(&mut self, distance: f32) -> Option<f32> {
        let previous = std::mem::replace(&mut self.previous, distance);
        (previous > 0.0).then(|| distance / previous)
    }
}

#[derive(Debug, Default, Resource)]
pub struct ActiveGestures {
    pub mouse: Option<PointerGesture>,
    pub touch: Option<PointerGesture>,
    pub pinch: Option<PinchGesture>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 5.0;

    #[test]
    fn small_motion_is_still_a_tap() {
        let mut gesture = PointerGesture::start(Vec2::new(100.0, 100.0), false);
        let step = gesture.move_to(Vec2::new(103.0, 95.0), THRESHOLD);
        assert_eq!(step.delta, Vec2::new(3.0, -5.0));
        assert!(!step.is_drag);
        assert!(gesture.is_tap());
    }

    #[test]
    fn threshold_is_measured_from_the_press_point() {
        let mut gesture = PointerGesture::start(Vec2::ZERO, false);
        for x in 1..=5 {
            assert!(!gesture.move_to(Vec2::new(x as f32, 0.0), THRESHOLD).is_drag);
        }
        let step = gesture.move_to(Vec2::new(6.0, 0.0), THRESHOLD);
        assert!(step.is_drag);
        assert_eq!(step.delta, Vec2::new(1.0, 0.0));

        // Coming back does not turn it into a tap again.
        assert!(gesture.move_to(Vec2::ZERO, THRESHOLD).is_drag);
        assert!(!gesture.is_tap());
    }

    #[test]
    fn gesture_over_ui_is_never_a_tap() {
        let gesture = PointerGesture::start(Vec2::ZERO, true);
        assert!(gesture.started_over_ui());
        assert!(!gesture.is_tap());
    }

    #[test]
    fn reanchor_swallows_the_jump() {
        let mut gesture = PointerGesture::start(Vec2::ZERO, false);
        gesture.mark_dragged();
        gesture.reanchor(Vec2::new(200.0, 40.0));
        let step = gesture.move_to(Vec2::new(202.0, 40.0), THRESHOLD);
        assert_eq!(step.delta, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn pinch_reports_ratio_to_previous_distance() {
        let mut pinch = PinchGesture::start(100.0);
        assert_eq!(pinch.update(200.0), Some(2.0));
        assert_eq!(pinch.update(100.0), Some(0.5));
    }

    #[test]
    fn pinch_from_zero_distance_is_no_change() {
        let mut pinch = PinchGesture::start(0.0);
        assert_eq!(pinch.update(50.0), None);
        assert_eq!(pinch.update(100.0), Some(2.0));
    }
}
