//! Domain layer: journeys, sessions, and the stage machine.
//!
//! Pure logic only; everything that talks to the outside world lives in
//! ports and adapters.

pub mod foundation;
pub mod journey;
pub mod orchestration;
pub mod session;
