//! JSON configuration for the command-line demos.

pub mod stereo;

pub use stereo::{load_config, StereoOutputConfig, StereoToolConfig};
