//! Time handling: real clock, explicit query times, and simulated time for tests.

pub mod source;
