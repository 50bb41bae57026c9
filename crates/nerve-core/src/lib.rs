pub mod command;
pub mod config;
pub mod error;
pub mod payload;
pub mod responder;
pub mod roast;
pub mod session;
pub mod store;
pub mod types;

pub use error::{NerveError, Result};
pub use payload::{Card, Outbound};
pub use responder::{Inbound, Responder};
pub use types::{Entry, Partition};
