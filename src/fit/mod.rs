//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - sweep peak velocity over the duration × displacement grid (parallel)
//! - fit each law by nonlinear least squares
//! - chain the inner and outer fits and flag poor inner fits

pub mod lm;
pub mod scaling;
pub mod sweep;

pub use lm::*;
pub use scaling::*;
pub use sweep::*;
