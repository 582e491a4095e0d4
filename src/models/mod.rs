//! Scaling-law model forms.
//!
//! Models are implemented as small, pure functions so that the curve fitter can
//! stay generic over the law being fitted.

pub mod model;

pub use model::*;
