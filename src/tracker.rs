//! Tracking session facade.
//!
//! Wires the pieces together: a position sample updates the trail and camera
//! and feeds the refresh policy; any directive the policy returns runs as a
//! spawned fetch whose completion flows back into the policy under the same
//! lock. The lock is never held across an await; stale completions are
//! discarded by the policy's request-id check rather than by aborting tasks.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::camera::Region;
use crate::geo::GeoPoint;
use crate::permissions::PermissionState;
use crate::policy::{
    FetchDirective, FetchOutcome, ROUTE_REFRESH_THRESHOLD_M, RefreshPolicy, TrackingState,
};
use crate::position::{PositionError, PositionErrorCode, PositionSample, WatchOptions};
use crate::traits::RouteService;

/// Destination used until the embedder configures one (Torun Center,
/// Istanbul).
const DEFAULT_DESTINATION: GeoPoint = GeoPoint::new(41.0655424, 28.9983691);

/// Session configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Fixed destination every route is fetched toward.
    pub destination: GeoPoint,
    /// Displacement from the last fetched origin that triggers a refetch.
    pub refresh_threshold_m: f64,
    /// Tuning handed to the location provider by the embedder.
    pub watch: WatchOptions,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION,
            refresh_threshold_m: ROUTE_REFRESH_THRESHOLD_M,
            watch: WatchOptions::default(),
        }
    }
}

/// Renderer-facing view of the session at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub tracking_state: TrackingState,
    pub permission_state: PermissionState,
    pub current_position: Option<GeoPoint>,
    /// Breadcrumb of every received position, oldest first.
    pub trail: Vec<GeoPoint>,
    /// Decoded route toward the destination, start first.
    pub route: Option<Vec<GeoPoint>>,
    pub destination: GeoPoint,
    pub region: Region,
}

#[derive(Debug)]
struct TrackerInner {
    policy: RefreshPolicy,
    permission_state: PermissionState,
    current_position: Option<GeoPoint>,
    trail: Vec<GeoPoint>,
    region: Region,
}

/// One tracking session toward a fixed destination.
///
/// Position updates are pushed in by the embedder; fetches run as tasks on
/// the ambient tokio runtime.
#[derive(Debug)]
pub struct RouteTracker<S> {
    service: Arc<S>,
    destination: GeoPoint,
    watch: WatchOptions,
    inner: Arc<Mutex<TrackerInner>>,
}

impl<S> RouteTracker<S>
where
    S: RouteService + Send + Sync + 'static,
{
    pub fn new(service: S, config: TrackerConfig) -> Self {
        Self {
            service: Arc::new(service),
            destination: config.destination,
            watch: config.watch,
            inner: Arc::new(Mutex::new(TrackerInner {
                policy: RefreshPolicy::with_threshold(config.refresh_threshold_m),
                permission_state: PermissionState::default(),
                current_position: None,
                trail: Vec::new(),
                region: Region::INITIAL,
            })),
        }
    }

    /// Records a position sample and refetches the route when the policy
    /// says the displacement warrants it.
    pub fn on_position_update(&self, sample: PositionSample) {
        let directive = {
            let mut inner = self.inner.lock().unwrap();
            inner.current_position = Some(sample.point);
            inner.trail.push(sample.point);
            inner.region = Region::follow(sample.point);
            inner.policy.on_position_update(sample.point)
        };

        if let Some(directive) = directive {
            self.spawn_fetch(directive);
        }
    }

    /// Handles a provider failure. A denied permission blocks the session;
    /// transient failures are logged and tracking continues on the next
    /// sample.
    pub fn on_position_error(&self, error: PositionError) {
        if error.code == PositionErrorCode::PermissionDenied {
            let mut inner = self.inner.lock().unwrap();
            inner.permission_state = PermissionState::Blocked;
            tracing::warn!(message = %error.message, "location permission revoked");
        } else {
            tracing::warn!(code = ?error.code, message = %error.message, "position update failed");
        }
    }

    /// Stops tracking. Route, origin, trail and position are cleared; a
    /// fetch still in flight will complete as stale.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.policy.on_tracking_stop();
        inner.current_position = None;
        inner.trail.clear();
        inner.region = Region::INITIAL;
    }

    /// Reports the outcome of the permission dialog flow.
    pub fn set_permission_state(&self, state: PermissionState) {
        self.inner.lock().unwrap().permission_state = state;
    }

    pub fn destination(&self) -> GeoPoint {
        self.destination
    }

    /// Subscription tuning the embedder should hand to its location
    /// provider.
    pub fn watch_options(&self) -> WatchOptions {
        self.watch
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let inner = self.inner.lock().unwrap();
        TrackerSnapshot {
            tracking_state: inner.policy.state(),
            permission_state: inner.permission_state,
            current_position: inner.current_position,
            trail: inner.trail.clone(),
            route: inner.policy.route().map(|route| route.to_vec()),
            destination: self.destination,
            region: inner.region,
        }
    }

    fn spawn_fetch(&self, directive: FetchDirective) {
        let service = Arc::clone(&self.service);
        let inner = Arc::clone(&self.inner);
        let destination = self.destination;

        tracing::debug!(
            request_id = directive.request_id,
            latitude = directive.origin.latitude,
            longitude = directive.origin.longitude,
            "route fetch issued"
        );

        tokio::spawn(async move {
            let result = service.fetch_route(directive.origin, destination).await;

            let mut inner = inner.lock().unwrap();
            match inner.policy.on_fetch_result(directive.request_id, result) {
                FetchOutcome::Installed { points } => {
                    tracing::debug!(request_id = directive.request_id, points, "route updated");
                }
                FetchOutcome::Failed(err) => {
                    tracing::warn!(request_id = directive.request_id, error = %err, "route fetch failed");
                }
                FetchOutcome::Stale => {
                    tracing::trace!(request_id = directive.request_id, "stale completion discarded");
                }
            }
        });
    }
}
