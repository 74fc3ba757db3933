//! CLI command implementations.

pub(crate) mod pack;
pub(crate) mod serve;

pub(crate) use pack::PackArgs;
pub(crate) use serve::ServeArgs;
