//! Infrastructure Layer

pub mod memory;
pub mod notifier;
pub mod postgres;
