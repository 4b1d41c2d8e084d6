//! Read-only model of the external schedule layer.

pub mod model;
