pub mod annotation;

pub use annotation::{angle_label, Annotator};
