//! Sessions

pub(crate) mod create;
