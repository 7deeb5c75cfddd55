// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;

pub use crate::config::DrillConfig;
pub use crate::core::curriculum::Curriculum;
pub use crate::core::engine::{AnswerOutcome, DrillEngine, DrillState};
pub use crate::core::events::{DrillEvent, SoundCue};
pub use crate::core::types::{Direction, Glyph, SettingName, Token};
pub use crate::error::DrillError;
