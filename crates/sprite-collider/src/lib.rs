//! Umbrella crate for the `sprite-collider` workspace.
//!
//! Re-exports the stage crates and adds [`analyze`], which runs the whole
//! pixel-to-physics pipeline on one RGBA buffer.

mod pipeline;

pub use pipeline::{
    AnalyzeConfig, NoopObserver, PhysicsAnalysis, PipelineObserver, analyze,
    analyze_with_observer,
};
pub use sc_contour::*;
pub use sc_core::*;
pub use sc_export::*;
pub use sc_grid::*;
pub use sc_morph::*;
pub use sc_poly::*;
