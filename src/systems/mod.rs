pub mod transform_system;

pub use transform_system::{propagate, TransformSystem};
