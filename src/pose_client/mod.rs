pub mod client;

#[allow(clippy::all)]
#[path = "pose.v1.rs"]
pub mod pose;
