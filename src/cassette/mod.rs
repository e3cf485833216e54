//! Cassette format for recording and replaying shell interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
