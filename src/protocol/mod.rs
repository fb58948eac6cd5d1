//! Across protocol types
//!
//! This module contains the request and response types of Across's
//! suggested-fees API.

mod quote;

pub use quote::{Quote, QuoteRequest};
