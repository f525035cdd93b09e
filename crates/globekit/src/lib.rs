pub mod animation;
pub mod arcs;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod hover;
pub mod markers;
pub mod mesh_data;
pub mod orbit;
pub mod palette;
pub mod picking;
pub mod projection;
pub mod relief;
pub mod stars;
pub mod texture;

pub use config::{ConfigError, DeviceClass, GlobeConfig};
pub use dataset::{Arc, Category, Dataset, DatasetError, GeoPoint, PointId};
pub use filter::CategoryFilter;
pub use projection::project;
