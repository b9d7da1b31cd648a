pub mod classifier;
pub mod confluence;
pub mod indicators;
pub mod risk;
pub mod sessions;
pub mod window;
