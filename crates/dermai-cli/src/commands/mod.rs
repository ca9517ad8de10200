//! Command handlers grouped by concern.

pub(crate) mod analysis;
pub(crate) mod chat;
pub(crate) mod conditions;
pub(crate) mod health;
