pub mod analysis;
pub mod cv;
