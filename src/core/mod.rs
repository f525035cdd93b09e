pub(crate) mod camera;
pub mod schedule;
pub mod state;
