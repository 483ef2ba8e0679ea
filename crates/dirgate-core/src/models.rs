//! Domain models for dirgate.
//!
//! These are the core types shared across all crates.

pub mod demo_day;
pub mod grant;
pub mod member;
pub mod role;
pub mod scope;
