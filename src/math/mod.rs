//! Mathematical utilities: grids, polynomial evaluation and least squares.

pub mod ols;
pub mod poly;
pub mod space;

pub use ols::*;
pub use poly::*;
pub use space::*;
