//! Model asset management: catalog and download cache.

pub mod catalog;
#[cfg(feature = "model-download")]
pub mod download;
