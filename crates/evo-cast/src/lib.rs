//! Choosing concrete classes for open generic types.
//!
//! Whenever test construction needs to instantiate a type variable or wildcard it asks a
//! [`TypeInstantiationManager`]. The manager keeps a [`PrioritizedCandidatePool`] of classes known
//! to be constructible, answers from it with a rank-biased random pick, and learns new candidates
//! from the analyzed classes and the enclosing owner bindings when nothing known fits.
//!
//! The surrounding generator supplies the class hierarchy, the legality rules and the analyzed
//! class universe through the traits in [`cluster`].

#![forbid(unsafe_code)]

mod bindings;
mod bounds;
pub mod cluster;
mod error;
mod manager;
mod pool;
mod selection;

pub use bindings::OwnerBindings;
pub use bounds::{parameterize_as, satisfies_bounds, OpenType};
pub use cluster::TestCluster;
pub use error::CastError;
pub use manager::{TypeInstantiationManager, DISCOVERED_PRIORITY};
pub use pool::PrioritizedCandidatePool;
pub use selection::{rank_biased_index, select_rank_biased};
