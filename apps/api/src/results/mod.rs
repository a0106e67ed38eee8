// Results view: runs the derivation pipeline over the session's stored jobs.

pub mod handlers;
pub mod views;
