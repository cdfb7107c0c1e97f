//! Webhook authentication, dispatch and endpoint lifecycle for SecureHook.
//!
//! This crate defines the "ports" (repository, hasher, token and host traits)
//! that the infrastructure layer implements. It depends only on
//! `securehook-types`, never on `securehook-infra` or any database/IO crate.

pub mod auth;
pub mod event;
pub mod repository;
pub mod service;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;
