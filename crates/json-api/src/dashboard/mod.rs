//! Dashboard

pub(crate) mod stats;
