// RazerGenie custom matrix editor - shared library
// Configuration, simulated device descriptions and the terminal editor

pub mod config;
pub mod simulate;
pub mod tui;

pub use config::GenieConfig;
pub use simulate::SimulatedProfile;
