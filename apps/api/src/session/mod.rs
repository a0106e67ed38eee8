// Session-scoped endpoints: CV upload, CV profile, preferences and the model
// run, saved jobs. Network calls go through matching_client only.

pub mod busy;
pub mod handlers;
