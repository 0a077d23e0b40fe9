pub mod step;
pub mod world;
