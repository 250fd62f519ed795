//! Application layer: use cases that orchestrate the touchmap-core domain.
//!
//! Use cases only talk to the outside world through the [`gateway`] port;
//! concrete gateways live in the infrastructure layer.

pub mod detect;
pub mod gateway;
pub mod map_touch;
