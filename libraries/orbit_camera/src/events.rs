use bevy::prelude::*;

/// The camera left tracking mode on its own: a drag, or the tracked body disappeared.
#[derive(Debug, Clone, Copy, Event)]
pub struct TrackingCancelled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TapSource {
    Mouse,
    Touch,
}

/// A press and release that neither turned into a drag nor started over the UI.
#[derive(Debug, Clone, Copy, Event)]
pub struct PointerTap {
    /// Logical window coordinates, origin at the top-left corner.
    pub position: Vec2,
    pub source: TapSource,
}
