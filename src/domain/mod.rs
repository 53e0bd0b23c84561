//! Core request-pipeline types: the redirect allow-list and destination
//! validation.

pub mod allow_list;
pub mod destination;
