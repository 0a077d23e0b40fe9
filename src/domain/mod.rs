pub mod direction;
pub mod grid;
