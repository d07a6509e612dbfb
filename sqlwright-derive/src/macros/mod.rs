//! Macro implementations

pub mod active_record;

pub use active_record::derive_active_record;
