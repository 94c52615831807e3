//! Domain Entities

pub mod account;
pub mod role;

pub use account::Account;
pub use role::{Permission, Role};
