//! Shared UI theme: color palette and reusable widget constructors.

pub mod palette;
pub mod widget;
