pub use crate::galaxy::{GalaxyAnimation, GalaxyConfig, GalaxyGenerator, PointCloud};
