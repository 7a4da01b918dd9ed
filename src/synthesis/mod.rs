//! Program synthesis by speculative beam search.
//!
//! The search starts from a machine whose memory is entirely undecided. Each
//! node runs deterministically until it reads a cell nobody has decided yet;
//! it then branches into one child per instruction that cell could hold. The
//! beam keeps the children whose output best matches the target, and the
//! program is read back from the decisions on the path to the first node that
//! exits with the target as its output.
//!
//! # Modules
//!
//! - [`arena`]: Reference-counted storage of immutable search nodes
//! - [`speculative`]: Step function over a node lineage
//! - [`policy`]: Target-driven expansion and scoring
//! - [`driver`]: Search configuration, progress reporting and reconstruction

pub mod arena;
pub mod driver;
pub mod policy;
pub mod speculative;
