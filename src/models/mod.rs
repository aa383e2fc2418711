//! Data models for the PitCrew portal backend.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod attendance;
mod datastore;
mod join_request;
mod role;
mod team;

pub use attendance::*;
pub use datastore::*;
pub use join_request::*;
pub use role::*;
pub use team::*;
