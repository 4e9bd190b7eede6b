//! Chain Layout Solver Library
//!
//! Orders a set of machines into a single chain (each machine cabled to at
//! most two neighbors) so that the total cable length is minimized, given a
//! sparse table of which machine pairs can be connected at all.
//!
//! # Features
//!
//! - Sparse symmetric connection tables, parsed from plain text files
//! - Tagged cost evaluation (a chain with an impossible pair is Infeasible,
//!   never a sentinel number)
//! - Steepest hill climbing over the adjacent-swap neighborhood
//! - Random-restart driver with caller-supplied target, budget and seed
//!
//! # Example
//!
//! ```
//! use chain_layout_solver::instance::ChainInstance;
//! use chain_layout_solver::heuristics::restart::RandomRestart;
//!
//! // The 12-machine wiring problem from the original statement
//! let instance = ChainInstance::reference();
//!
//! let driver = RandomRestart::with_params(None, 50, 42);
//! let report = driver.search(&instance).expect("search failed");
//!
//! println!("Best ordering: {}", report.best.format_labels(&instance));
//! println!("Cable needed:  {}", report.best.cost);
//! ```

pub mod instance;
pub mod solution;
pub mod heuristics;

pub use instance::ChainInstance;
pub use solution::{Chain, Cost};
