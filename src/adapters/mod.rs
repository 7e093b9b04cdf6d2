//! Adapter implementations of the port traits.
//!
//! - `live`: real disk I/O.
//! - `recording`: wraps another adapter and captures every call to a cassette.
//! - `replaying`: serves calls from a previously recorded cassette.

pub mod live;
pub mod recording;
pub mod replaying;
