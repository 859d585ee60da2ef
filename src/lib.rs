// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod similarity;
pub mod spectrum;
pub mod tagger;

pub use crate::core::engine::PhoneticEngine;
pub use crate::error::{PhoneticError, Result};
pub use crate::spectrum::Spectrum;
