//! SQLite storage for endpoint registrations.

pub mod pool;
pub mod registration;
