//! A library exporting the contents of a hosted key-value database into a JSON document.

#![deny(warnings)]
#![deny(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod exporter;
pub mod io;
pub mod jutil;
pub mod report;
pub mod store;

#[cfg(test)]
mod testing;
