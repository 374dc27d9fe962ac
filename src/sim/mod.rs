pub mod event;
pub mod level;
pub mod plan;
pub mod step;
