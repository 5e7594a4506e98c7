//! Data models for the Equiptrack maintenance tracking application.
//!
//! Wire format is camelCase JSON to match the frontend interfaces.

mod equipment;
mod maintenance;
mod team;
mod user;

pub use equipment::*;
pub use maintenance::*;
pub use team::*;
pub use user::*;
