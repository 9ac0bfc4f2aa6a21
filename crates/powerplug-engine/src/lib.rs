//! Platformer engine: fixed-tick physics, swept AABB collision resolution,
//! seeded procedural level generation, and the session state machine that
//! ties them into a run.
//!
//! The engine is headless and synchronous. A host drives [`session::GameSession::tick`]
//! once per frame with an input snapshot and renders from the accessors; all
//! gameplay facts come back as [`powerplug_core::events::EngineEvent`] batches.

pub mod camera;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod level_gen;
pub mod physics;
pub mod session;
