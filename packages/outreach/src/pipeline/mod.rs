//! The four pipeline stages.
//!
//! Scout discovers, Analyst scrapes and scores, Sniper dispatches, Closer
//! watches replies. Stages run sequentially - one stage finishes before the
//! next begins - and every stage reads and writes through the ledger seam.

pub mod analyst;
pub mod closer;
pub mod scout;
pub mod sniper;

pub use analyst::{Analyst, AnalystConfig, AnalystReport};
pub use closer::{Closer, CloserConfig, CloserReport};
pub use scout::{Scout, ScoutConfig, ScoutReport, DIRECTORY_BLACKLIST};
pub use sniper::{Sniper, SniperConfig, SniperReport};
