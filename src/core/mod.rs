// src/core/mod.rs

pub mod alphabet;
pub mod curriculum;
pub mod distractor;
pub mod engine;
pub mod events;
pub mod levels;
pub mod timeline;
pub mod types;
