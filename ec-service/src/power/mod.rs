//! Power related data structures
pub mod supply;
