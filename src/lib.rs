pub mod camera_model;
pub mod color_grid;
pub mod colorizer;
pub mod config;
pub mod data_loader;
pub mod detected_points;
pub mod error;
pub mod frame_source;
pub mod io;
pub mod pool;
pub mod projector;
pub mod timer;
pub mod types;
pub mod visualization;

pub use colorizer::PointCloudColorizer;
pub use error::{ColorizerError, ColorizerResult};
