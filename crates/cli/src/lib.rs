//! Library surface for the `weft` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod paths;
