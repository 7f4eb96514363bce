//! Back-office domain concerns.

pub mod activity;
pub mod users;
