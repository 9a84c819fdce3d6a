//! Types shared between the relay and the HTTP surface

#![allow(clippy::must_use_candidate)]

mod error;
mod response;

pub use error::HttpError;
pub use response::{ChatResponse, ResponseStatus};
