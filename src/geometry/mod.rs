pub mod angle;

pub use angle::{angle_at_vertex, AngleResult, UndeterminedReason};
