//! Utility functions shared by hosts.

pub mod noqa;

#[doc(inline)]
pub use noqa::{is_suppressed, parse_noqa, Noqa};
