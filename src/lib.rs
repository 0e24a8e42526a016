//! Statement PDF service: stores financial statement data and renders it into
//! bank-statement PDF documents over a small HTTP API.

pub mod args;
mod error;
pub mod fonts;
pub mod http;
pub mod model;
pub mod pdf;
pub mod store;

pub use error::Error;
pub use error::Result;
