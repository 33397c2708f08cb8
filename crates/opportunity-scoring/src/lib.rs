//! Multi-factor opportunity scoring.
//!
//! Weighted component scores, recommendations, comparables, market dynamics,
//! sensitivity bands, portfolio matrices and trend correlations.

pub mod components;
pub mod correlation;
pub mod dynamics;
pub mod matrix;
pub mod scorer;
pub mod sensitivity;
pub mod similarity;
pub mod weights;

pub use components::*;
pub use correlation::*;
pub use dynamics::*;
pub use matrix::*;
pub use scorer::*;
pub use sensitivity::*;
pub use similarity::*;
pub use weights::*;
