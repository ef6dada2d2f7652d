//! Process-level I/O: signal handling and cancellation.

pub mod signals;
