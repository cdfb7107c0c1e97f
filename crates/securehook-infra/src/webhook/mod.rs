//! In-process webhook host.

pub mod registry;
