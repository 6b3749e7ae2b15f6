pub mod config;
pub mod controller;
pub mod dispatch;
pub mod merge;
pub mod model;
pub mod rest;
pub mod state;
pub mod telemetry;
pub mod transport;

mod error;
mod poll;

pub use config::FeedConfig;
pub use controller::{ConnectionState, FeedController, PollState};
pub use error::SyncError;
pub use state::FeedState;
