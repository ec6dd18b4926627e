mod client;
mod error;
pub mod form;

pub use client::Client;
pub use error::Error;
