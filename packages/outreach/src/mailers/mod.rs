//! Mail transport implementations.

pub mod relay;

pub use relay::HttpMailRelay;
