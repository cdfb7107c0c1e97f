//! Business logic services (use cases).
//!
//! Services depend on traits (ports), never on concrete infrastructure.

pub mod hash;
pub mod lifecycle;
pub mod setup;
pub mod token;
