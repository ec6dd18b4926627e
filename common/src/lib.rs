pub mod data_url;
pub mod v1;

pub use data_url::{Blob, DataUrl};
