//! Core domain types and the projection engine.
//!
//! Data flows strictly forward: rules and settings go through [`simulation`],
//! then [`aggregate`], then [`display`]. [`projection`] wires the stages together.

pub mod transaction;
pub mod settings;
pub mod point;
pub mod recurrence;
pub mod simulation;
pub mod aggregate;
pub mod display;
pub mod projection;
pub mod calendar;
pub mod config_validation;
pub mod error;
