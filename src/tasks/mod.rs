//! Background Tasks Module
//!
//! Contains background work that runs alongside cache callers.
//!
//! # Tasks
//! - Expiry Sweeper: removes expired cache entries at a fixed interval

mod sweeper;

pub(crate) use sweeper::Sweeper;
