pub mod controller;
pub mod detection;
pub mod generate;
pub mod model;
pub mod params;
pub mod projection;
pub mod rule;
pub mod runner;
pub mod state;

mod types;

pub use types::ComponentId;
