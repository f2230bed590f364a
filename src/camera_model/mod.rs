pub mod generic;
pub mod pinhole;

pub use generic::CameraProjection;
pub use pinhole::PinholeCamera;
