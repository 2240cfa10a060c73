//! Subcommands

pub(crate) mod analyse;
pub(crate) mod sample;
