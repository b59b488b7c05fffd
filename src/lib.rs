//! Eldergrove library crate: the gameplay core of a 2D action-adventure.
//!
//! The binary crate (`main.rs`) runs a headless demo session.
//! This library crate exposes every module so that a presentation layer and
//! the `tests/` integration tests can drive a session without a window.

pub mod shared;
pub mod config;
pub mod content;
pub mod store;
pub mod dialogue;
pub mod input;
pub mod world;
pub mod session;
