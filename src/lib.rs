//! Vigil library crate
//!
//! This crate provides both a CLI binary and a library API for programmatic use

pub mod cli;
pub mod scanner;
pub mod walker;
pub mod hasher;
pub mod snapshot;
pub mod differ;
pub mod output;
pub mod config;
pub mod progress;
pub mod error;
