//! Port definitions (interfaces to the outside world)

pub mod generator;
pub mod observer;
