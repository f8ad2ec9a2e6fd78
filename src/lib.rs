//! route-tracker core
//!
//! Live-position tracking toward a fixed destination: a polyline geometry
//! codec and the policy deciding when a driving route must be refetched,
//! plus the session plumbing around them (trail, camera, permissions).

pub mod traits;
pub mod policy;
pub mod tracker;
pub mod osrm;
pub mod geo;
pub mod polyline;
pub mod error;
pub mod position;
pub mod permissions;
pub mod camera;
