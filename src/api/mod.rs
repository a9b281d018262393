pub mod client;
pub mod endpoints;
pub mod error;
pub mod types;

pub use client::{Ack, ApiClient, ClientOptions, Envelope, Query};
pub use endpoints::{BlogQuery, Length};
pub use error::{ApiError, FieldMessages};
pub use types::*;
