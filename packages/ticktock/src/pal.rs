//! Platform abstraction layer for reading the monotonic clock.
//!
//! This module allows switching between the real monotonic clock of the operating
//! system and a fake clock that tests advance explicitly.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
