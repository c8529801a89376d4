//! Domain types for Guardrail Core.
//!
//! This module contains the verdict and result entities shared by the
//! engine and the HTTP layer.

mod result;
mod verdict;

pub use result::*;
pub use verdict::*;
