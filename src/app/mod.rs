pub mod context;
pub mod controller;
pub mod error;

pub use context::AppContext;
pub use error::{ErrorCode, FeedwatchError, Result};
