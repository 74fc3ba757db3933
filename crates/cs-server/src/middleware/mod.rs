//! HTTP middleware.

pub(crate) mod host_router;
pub(crate) mod security;
