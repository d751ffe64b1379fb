//! HTTP handlers, grouped by audience.

pub mod admin;
pub mod clearance;
pub mod login;
