//! pixcast library crate.
//!
//! Renders remote images as fixed-width text or truecolor grids and serves
//! them over a line-oriented TCP protocol. The modules are exposed for
//! integration testing and for the `pixcast` binary.

pub mod ascii;
pub mod config;
pub mod fetch;
pub mod raster;
pub mod server;
