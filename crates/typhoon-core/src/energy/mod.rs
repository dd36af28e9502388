//! Energy bar and storm classification.
//!
//! The accumulator turns per-tick intensity into a smoothed energy level; the
//! tier table maps both the live level and the session result onto the same
//! set of storm classes.

mod accumulator;
mod tier;

pub use accumulator::{EnergyAccumulator, EnergyBranch, EnergyUpdate};
pub use tier::{default_tiers, Classification, Tier, TierTable};
