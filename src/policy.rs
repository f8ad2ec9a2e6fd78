//! Route refresh decision policy.
//!
//! An explicit state machine, decoupled from any runtime: position updates
//! come in and fetch directives go out. Completions are matched against a
//! monotonically increasing request id so that only the most recently
//! issued fetch may ever change session state. Superseded or post-stop
//! completions are stale and mutate nothing. The policy performs no I/O.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::geo::GeoPoint;
use crate::polyline;

/// Displacement from the last fetched origin that justifies a refetch.
pub const ROUTE_REFRESH_THRESHOLD_M: f64 = 25.0;

/// Identity of one issued fetch; a later id supersedes every earlier one.
pub type RequestId = u64;

/// Where the session is between position updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    /// Not tracking.
    Idle,
    /// A route request is in flight.
    Fetching,
    /// Tracking, no request in flight.
    Ready,
}

/// Instruction to the caller to execute one fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchDirective {
    pub request_id: RequestId,
    pub origin: GeoPoint,
}

/// What applying a completion did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A decoded route replaced the previous one.
    Installed { points: usize },
    /// The fetch failed; the previous route is kept and the origin cleared.
    Failed(RouteError),
    /// Superseded or post-stop completion; nothing changed.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: RequestId,
    origin: GeoPoint,
}

/// Per-session refresh state machine. Single writer; callers serialize
/// access and execute the directives it returns.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    threshold_m: f64,
    state: TrackingState,
    last_fetched_origin: Option<GeoPoint>,
    in_flight: Option<InFlight>,
    next_request_id: RequestId,
    route: Option<Vec<GeoPoint>>,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshPolicy {
    pub fn new() -> Self {
        Self::with_threshold(ROUTE_REFRESH_THRESHOLD_M)
    }

    pub fn with_threshold(threshold_m: f64) -> Self {
        Self {
            threshold_m,
            state: TrackingState::Idle,
            last_fetched_origin: None,
            in_flight: None,
            next_request_id: 0,
            route: None,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// The decoded route currently on display, if any.
    pub fn route(&self) -> Option<&[GeoPoint]> {
        self.route.as_deref()
    }

    /// Origin of the last request that completed successfully.
    pub fn last_fetched_origin(&self) -> Option<GeoPoint> {
        self.last_fetched_origin
    }

    /// Feeds one position through the policy.
    ///
    /// Returns a directive when displacement from the last fetched origin
    /// reaches the threshold, or unconditionally when no fetch has succeeded
    /// yet. Issuing a directive supersedes any fetch still in flight; the
    /// superseded completion will come back stale.
    pub fn on_position_update(&mut self, position: GeoPoint) -> Option<FetchDirective> {
        if let Some(origin) = self.last_fetched_origin {
            if origin.distance_meters(&position) < self.threshold_m {
                return None;
            }
        }

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight {
            id,
            origin: position,
        });
        self.state = TrackingState::Fetching;

        Some(FetchDirective {
            request_id: id,
            origin: position,
        })
    }

    /// Applies a fetch completion.
    ///
    /// A completion tagged with anything but the currently in-flight request
    /// id is stale: no decode, no state change. A live success installs the
    /// decoded route and records the origin the request was issued with
    /// (which is not necessarily the latest position). A live failure keeps
    /// the previous route but clears the origin, so the next position update
    /// re-qualifies regardless of displacement.
    pub fn on_fetch_result(
        &mut self,
        request_id: RequestId,
        result: Result<Option<String>, RouteError>,
    ) -> FetchOutcome {
        let Some(in_flight) = self.in_flight else {
            return FetchOutcome::Stale;
        };
        if in_flight.id != request_id {
            return FetchOutcome::Stale;
        }

        self.in_flight = None;
        self.state = TrackingState::Ready;

        match usable_route(result) {
            Ok(points) => {
                let installed = points.len();
                self.route = Some(points);
                self.last_fetched_origin = Some(in_flight.origin);
                FetchOutcome::Installed { points: installed }
            }
            Err(err) => {
                self.last_fetched_origin = None;
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Stops the session: route state is dropped and any in-flight
    /// completion becomes stale.
    pub fn on_tracking_stop(&mut self) {
        self.in_flight = None;
        self.route = None;
        self.last_fetched_origin = None;
        self.state = TrackingState::Idle;
    }
}

/// Reduces a raw completion to a non-empty decoded route, or to the failure
/// that should drive re-qualification.
fn usable_route(
    result: Result<Option<String>, RouteError>,
) -> Result<Vec<GeoPoint>, RouteError> {
    let Some(geometry) = result? else {
        return Err(RouteError::EmptyRoute);
    };

    let points = polyline::decode(&geometry)?;
    if points.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    Ok(points)
}
