//! Platform abstraction layer for timestamp capture.
//!
//! The meter reads time through this layer so that unit tests can substitute a fake
//! platform and drive the clock deterministically.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
