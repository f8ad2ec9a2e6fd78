//! Core service traits for the tracking session.
//!
//! These are intentionally minimal. Concrete apps implement them over their
//! platform SDKs; tests implement them with mocks.

use std::future::Future;

use crate::error::RouteError;
use crate::geo::GeoPoint;
use crate::permissions::{LocationPermission, PermissionStatus};

/// Fetches driving routes from an external routing service.
pub trait RouteService {
    /// Requests a route from `origin` to `destination`.
    ///
    /// Returns the encoded geometry of the best route, or `None` when the
    /// service has no route between the two points (which is not an error).
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<Option<String>, RouteError>> + Send;
}

/// OS permission dialogs for a single permission at a time.
///
/// `check` reads the current status without prompting; `request` may show a
/// system dialog and returns the resulting status.
pub trait PermissionClient {
    fn check(&self, permission: LocationPermission) -> PermissionStatus;
    fn request(&self, permission: LocationPermission) -> PermissionStatus;
}
