//! Production implementations of the bridge trait abstractions.
//!
//! This module provides the implementations of the traits defined in
//! [`crate::traits`] that talk to a real wallet endpoint, Across's
//! suggested-fees API, and the system clock.

mod across;
mod alloy;
mod tokio_clock;

pub use self::across::AcrossQuoteProvider;
pub use self::alloy::{AlloySigner, AlloyWallet};
pub use self::tokio_clock::TokioClock;
