mod labels;
mod result;

pub use labels::{Category, LabelMap};
pub use result::{BoundingBox, Detection};
