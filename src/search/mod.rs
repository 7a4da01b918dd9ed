//! Generic beam search.
//!
//! # Modules
//!
//! - [`beam`]: Frontier expansion, scoring and pruning with randomized tie-breaks
//! - [`errors`]: Search configuration errors

pub mod beam;
pub mod errors;
