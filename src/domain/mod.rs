pub mod actor;
pub mod input;
pub mod physics;
pub mod tile;
pub mod vector;
