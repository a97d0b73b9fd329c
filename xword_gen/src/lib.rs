#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod arc;
pub mod assignment;
pub mod domain;
pub mod layout;
pub mod overlap;
pub mod search;
pub mod slot;
pub mod validate;
pub mod xword;
