//! Interface profiles and the host settings each one applies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::host::{SceneHost, SettingValue};

/// Session-layer camera used as the AR camera output
pub const AR_CAMERA_PATH: &str = "/SessionLayer/XRCam";

/// Interface mode the host was launched in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceProfile {
    #[default]
    Screen,
    Vr,
    Ar,
}

impl InterfaceProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceProfile::Screen => "screen",
            InterfaceProfile::Vr => "vr",
            InterfaceProfile::Ar => "ar",
        }
    }

    /// Settings applied once when the host becomes available
    pub fn startup_settings(&self) -> &'static [(&'static str, SettingValue)] {
        match self {
            InterfaceProfile::Screen => &[],
            InterfaceProfile::Vr => VR_STARTUP_SETTINGS,
            InterfaceProfile::Ar => AR_STARTUP_SETTINGS,
        }
    }

    /// Settings applied after every target load
    pub fn post_load_settings(&self) -> &'static [(&'static str, SettingValue)] {
        match self {
            InterfaceProfile::Ar => AR_POST_LOAD_SETTINGS,
            _ => &[],
        }
    }
}

impl fmt::Display for InterfaceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "screen" => Ok(InterfaceProfile::Screen),
            "vr" => Ok(InterfaceProfile::Vr),
            "ar" => Ok(InterfaceProfile::Ar),
            other => Err(format!(
                "unknown interface mode '{}', expected screen, vr or ar",
                other
            )),
        }
    }
}

/// Write each setting to the host. Failures are logged and skipped.
///
/// Returns the number of settings that were applied.
pub fn apply_settings<H: SceneHost + ?Sized>(
    host: &mut H,
    settings: &[(&'static str, SettingValue)],
) -> usize {
    let mut applied = 0;
    for (key, value) in settings {
        match host.set_setting(key, value.clone()) {
            Ok(()) => {
                debug!(setting = %key, value = %value, "Applied setting");
                applied += 1;
            }
            Err(e) => warn!(setting = %key, error = %e, "Failed to apply setting"),
        }
    }
    applied
}

const VR_STARTUP_SETTINGS: &[(&str, SettingValue)] = &[
    ("/persistent/xr/profile/vr/system/display", SettingValue::Text("SteamVR")),
    ("/persistent/xr/profile/vr/render/resolutionMultiplier", SettingValue::Float(2.0)),
    // none / warped / inset
    ("/persistent/xr/profile/vr/foveation/mode", SettingValue::Text("warped")),
    (
        "/persistent/xr/profile/vr/foveation/warped/resolutionMultiplier",
        SettingValue::Float(0.5),
    ),
    ("/persistent/xr/profile/vr/foveation/warped/insetSize", SettingValue::Float(0.4)),
];

const AR_STARTUP_SETTINGS: &[(&str, SettingValue)] = &[
    ("/xr/cloudxr/version", SettingValue::Float(4.1)),
    ("/xr/depth/aov", SettingValue::Text("GBufferDepth")),
    ("/xr/simulatedxr/enabled", SettingValue::Bool(true)),
    ("/persistent/renderer/raytracingOmm/enabled", SettingValue::Bool(true)),
    ("/rtx-transient/resourcemanager/enableTextureStreaming", SettingValue::Bool(false)),
    ("/xr/ui/enabled", SettingValue::Bool(false)),
    ("/defaults/xr/profile/ar/renderQuality", SettingValue::Text("off")),
    ("/defaults/xr/profile/ar/system/display", SettingValue::Text("CloudXR41")),
    ("/persistent/xr/profile/ar/render/nearPlane", SettingValue::Float(0.15)),
    ("/persistent/rtx/sceneDb/allowDuplicateAhsInvocation", SettingValue::Bool(false)),
];

const AR_POST_LOAD_SETTINGS: &[(&str, SettingValue)] = &[
    ("/xrstage/profile/ar/anchorMode", SettingValue::Text("scene origin")),
    ("/xrstage/profile/ar/enableCameraOutput", SettingValue::Bool(true)),
    ("/xrstage/profile/ar/cameraOutputPath", SettingValue::Text(AR_CAMERA_PATH)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        assert_eq!("screen".parse::<InterfaceProfile>(), Ok(InterfaceProfile::Screen));
        assert_eq!(" VR ".parse::<InterfaceProfile>(), Ok(InterfaceProfile::Vr));
        assert_eq!("ar".parse::<InterfaceProfile>(), Ok(InterfaceProfile::Ar));
        assert!("hologram".parse::<InterfaceProfile>().is_err());
    }

    #[test]
    fn test_only_ar_has_post_load_settings() {
        assert!(InterfaceProfile::Screen.post_load_settings().is_empty());
        assert!(InterfaceProfile::Vr.post_load_settings().is_empty());

        let ar = InterfaceProfile::Ar.post_load_settings();
        assert_eq!(ar.len(), 3);
        assert!(ar
            .iter()
            .any(|(k, v)| *k == "/xrstage/profile/ar/cameraOutputPath"
                && *v == SettingValue::Text(AR_CAMERA_PATH)));
    }

    #[test]
    fn test_apply_settings_counts_successes() {
        let mut host = crate::host::fake::FakeHost::default();
        let applied = apply_settings(&mut host, InterfaceProfile::Vr.startup_settings());
        assert_eq!(applied, 5);
        assert_eq!(
            host.settings[1],
            (
                "/persistent/xr/profile/vr/render/resolutionMultiplier".to_string(),
                SettingValue::Float(2.0)
            )
        );
    }

    #[test]
    fn test_apply_settings_skips_failures() {
        let mut host = crate::host::fake::FakeHost::default();
        host.fail_settings = true;
        let applied = apply_settings(&mut host, InterfaceProfile::Ar.startup_settings());
        assert_eq!(applied, 0);
        assert!(host.settings.is_empty());
    }

    #[test]
    fn test_startup_settings_per_profile() {
        assert!(InterfaceProfile::Screen.startup_settings().is_empty());
        assert_eq!(InterfaceProfile::Vr.startup_settings().len(), 5);
        assert_eq!(InterfaceProfile::Ar.startup_settings().len(), 10);
    }
}
