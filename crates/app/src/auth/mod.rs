//! Authentication

mod errors;
mod guard;
mod password;
mod service;
mod token;

pub use errors::*;
pub use guard::*;
pub use password::*;
pub use service::*;
pub use token::*;
