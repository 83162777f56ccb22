//! # Particle FX
//!
//! A 2D GPU particle effect demo built on wgpu, winit and egui.
//!
//! ## Features
//!
//! - **Fixed-capacity particle pool**: structure-of-arrays storage where live
//!   particles always occupy a dense prefix, with O(1) swap-remove recycling
//! - **Timed emission**: one-shot and looping emitters with a millisecond
//!   cadence, catch-up on long frames and optional attribute randomization
//! - **Buffer packing**: per-frame GPU buffers in either an instanced
//!   (model matrix + colour) or a pre-expanded quad layout
//! - **Render dispatch**: pre-allocated wgpu buffers, orthographic screen
//!   projection and additive blending
//! - **Editor**: an egui panel that edits the emitter through commands
//!
//! ## Frame Flow
//!
//! ```text
//! input → panel commands → pool.update(dt) → packer.pack() → sink.upload() → draw
//! ```
//!
//! ### Example
//!
//! ```
//! use particle_fx::core::time::Timestep;
//! use particle_fx::render::particles::{EmitterConfig, ParticlePool};
//!
//! let mut pool = ParticlePool::with_seed(100, 1);
//! pool.configure(EmitterConfig::default().with_life(1.0));
//! pool.emit().unwrap();
//! pool.update(Timestep::from_millis(50.0));
//! assert!(pool.len() > 0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Engine loop, application state, timestep and errors
//! - [`render`]: Particle pool, packer, renderer and GPU context
//! - [`config`]: TOML/JSON configuration with environment overrides
//! - [`editor`]: egui integration and the particle emitter panel
//! - [`platform`]: winit window and input translation

/// Core engine functionality including the main loop and error types
pub mod core;
/// Platform abstraction layer over winit
pub mod platform;
/// Particle simulation and GPU rendering
pub mod render;
/// Built-in editor tools
pub mod editor;
/// Configuration system
pub mod config;
