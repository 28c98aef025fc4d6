//! Event layout: interval packing and the per-day layout cache.

pub mod cache;
pub mod packer;
