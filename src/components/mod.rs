pub use camera::*;
pub use light::*;
pub use name::*;
pub use transform::*;

pub mod camera;
pub mod light;
pub mod name;
pub mod transform;
