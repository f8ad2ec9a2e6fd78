//! Location permission sequencing.
//!
//! Encodes the platform-specific dialog flows: iOS prompts for when-in-use
//! and always together and accepts either; Android needs fine location first
//! and, from API 29 on, a separate background-location grant. The OS dialogs
//! themselves sit behind [`PermissionClient`].

use serde::{Deserialize, Serialize};

use crate::traits::PermissionClient;

/// First Android API level with a separate background-location permission.
pub const BACKGROUND_LOCATION_MIN_API: u32 = 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android { api_level: u32 },
}

/// A single OS-level location permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationPermission {
    /// iOS foreground location.
    WhenInUse,
    /// iOS background location.
    Always,
    /// Android precise location.
    FineLocation,
    /// Android background location (API 29+).
    BackgroundLocation,
}

/// Status the OS reports for a single permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Not available on this device.
    Unavailable,
    /// Denied but still requestable.
    Denied,
    /// Granted with restrictions.
    Limited,
    Granted,
    /// Denied for good; only the system settings screen can change it.
    Blocked,
}

impl PermissionStatus {
    /// Limited access still counts as granted.
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted | PermissionStatus::Limited)
    }

    fn is_unrequestable(self) -> bool {
        matches!(self, PermissionStatus::Blocked | PermissionStatus::Unavailable)
    }
}

/// Session-level permission state driving the tracking screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermissionState {
    #[default]
    Pending,
    Granted,
    Blocked,
}

/// Shows the platform's permission prompts and reduces the results to a
/// session state.
///
/// Android keeps the session `Pending` when fine location is denied but
/// still requestable, so the caller can offer a retry.
pub fn request_permissions<C: PermissionClient>(platform: Platform, client: &C) -> PermissionState {
    let state = match platform {
        Platform::Ios => {
            let when_in_use = client.request(LocationPermission::WhenInUse);
            let always = client.request(LocationPermission::Always);

            if always.is_granted() || when_in_use.is_granted() {
                PermissionState::Granted
            } else {
                PermissionState::Blocked
            }
        }
        Platform::Android { api_level } => {
            let fine = client.request(LocationPermission::FineLocation);
            if !fine.is_granted() {
                let state = if fine == PermissionStatus::Blocked {
                    PermissionState::Blocked
                } else {
                    PermissionState::Pending
                };
                tracing::info!(?state, "fine location request denied");
                return state;
            }

            let background = if api_level >= BACKGROUND_LOCATION_MIN_API {
                client.request(LocationPermission::BackgroundLocation)
            } else {
                PermissionStatus::Granted
            };

            if background.is_granted() {
                PermissionState::Granted
            } else {
                PermissionState::Blocked
            }
        }
    };

    tracing::info!(?state, "location permission request finished");
    state
}

/// Checks current statuses first and only falls back to prompting when the
/// outcome is still open.
pub fn ensure_permissions<C: PermissionClient>(platform: Platform, client: &C) -> PermissionState {
    match platform {
        Platform::Ios => {
            let always = client.check(LocationPermission::Always);
            let when_in_use = client.check(LocationPermission::WhenInUse);

            if always.is_granted() || when_in_use.is_granted() {
                return PermissionState::Granted;
            }
            if always.is_unrequestable() && when_in_use.is_unrequestable() {
                return PermissionState::Blocked;
            }
        }
        Platform::Android { api_level } => {
            let fine = client.check(LocationPermission::FineLocation);
            let background = if api_level >= BACKGROUND_LOCATION_MIN_API {
                client.check(LocationPermission::BackgroundLocation)
            } else {
                PermissionStatus::Granted
            };

            if fine.is_granted() && background.is_granted() {
                return PermissionState::Granted;
            }
            if fine.is_unrequestable() || background.is_unrequestable() {
                return PermissionState::Blocked;
            }
        }
    }

    request_permissions(platform, client)
}
