//! Synthetic interbedded chalk/flint cross-sections.
//!
//! A section is built by repeatedly simulating a laterally correlated
//! host-layer thickness profile, accumulating it column by column from the
//! base upwards, and stamping a one-cell flint band at each new top.

pub mod error;
pub mod export;
pub mod field;
pub mod grid;
pub mod metrics;
pub mod params;
pub mod section;
pub mod variogram;

pub use error::SectionError;
pub use field::{FieldSimulator, NoiseFieldSimulator};
pub use grid::{Lithology, LithologyGrid};
pub use params::{SectionParams, ThicknessPolicy};
pub use section::{generate_interbedded_section, SectionGenerator, SectionResult};
