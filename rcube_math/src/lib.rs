//! Minimal linear algebra for the rcube scene graph.
//!
//! Matrices are column-major and multiply column vectors (`M * v`), so
//! `parent * local` applies `local` first.

pub mod mat4;
pub mod quat;
pub mod vec3;
pub mod vec4;

pub use self::mat4::Mat4;
pub use self::quat::Quat;
pub use self::vec3::Vec3;
pub use self::vec4::Vec4;
