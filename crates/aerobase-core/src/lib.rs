//! Core types and trait definitions for the Aerobase operations store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod dashboard;
pub mod document;
pub mod flight;
pub mod mission;
pub mod notification;
pub mod org;
pub mod procedure;
pub mod session;
pub mod shift;
pub mod store;
pub mod ticket;
