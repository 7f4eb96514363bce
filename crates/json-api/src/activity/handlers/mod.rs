//! Activity Handlers

pub(crate) mod index;
pub(crate) mod user;
