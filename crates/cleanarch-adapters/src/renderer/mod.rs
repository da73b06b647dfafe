//! Template engine.

mod engine;

pub use engine::TeraRenderer;
