use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

/// Windows narrower than this use the touch layout.
const MOBILE_MAX_WIDTH: f32 = 768.0;
const MOBILE_USER_AGENTS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub(crate) struct PlatformPlugin;

impl Plugin for PlatformPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(UserAgent(user_agent()))
            .init_resource::<DeviceProfile>()
            .add_systems(Startup, update_device_profile)
            .add_systems(
                Update,
                update_device_profile.run_if(on_event::<WindowResized>),
            );
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Resource)]
pub(crate) enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Debug, Resource)]
struct UserAgent(Option<String>);

pub(crate) fn is_mobile(user_agent: Option<&str>, window_width: f32) -> bool {
    let mobile_agent = user_agent.is_some_and(|agent| {
        let agent = agent.to_lowercase();
        MOBILE_USER_AGENTS.iter().any(|needle| agent.contains(needle))
    });
    mobile_agent || window_width < MOBILE_MAX_WIDTH
}

#[cfg(target_arch = "wasm32")]
fn user_agent() -> Option<String> {
    web_sys::window()?.navigator().user_agent().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn user_agent() -> Option<String> {
    None
}

fn update_device_profile(
    user_agent: Res<UserAgent>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut profile: ResMut<DeviceProfile>,
) {
    let Ok(window) = q_window.get_single() else {
        return;
    };
    let detected = if is_mobile(user_agent.0.as_deref(), window.width()) {
        DeviceProfile::Mobile
    } else {
        DeviceProfile::Desktop
    };
    if profile.set_if_neq(detected) {
        info!("Device profile: {detected:?}");
    }
}
