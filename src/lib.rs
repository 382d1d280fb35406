//! SafeGround: location extraction and parse-rate evaluation for
//! ground-subsidence risk evaluation titles.

pub mod location;
pub mod report;
pub mod server;
