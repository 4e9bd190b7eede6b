//! Search heuristics for the chain layout problem.
//!
//! This module exports the adjacent-swap neighborhood, the hill climber
//! and the random-restart driver.

pub mod neighborhood;
pub mod hill_climb;
pub mod restart;

pub use neighborhood::*;
pub use hill_climb::*;
pub use restart::*;
