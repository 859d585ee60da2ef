// src/core/mod.rs

pub mod accent;
pub mod dictionary;
pub mod engine;
pub mod rules;
pub mod stress;
pub mod types;
