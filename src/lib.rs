//! eDNA sampler pump trigger library.
//!
//! Exposes the decision core ([`trigger`]), the deployment lifecycle
//! around it ([`app`]) and the thin hardware and server adapters, so the
//! whole sampling run can be exercised on the host with mock ports.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod deployment;
pub mod error;
pub mod trigger;

pub mod adapters;
pub mod drivers;
pub mod sensors;
