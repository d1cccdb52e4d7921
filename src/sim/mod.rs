pub mod event;
pub mod lifecycle;
pub mod step;
pub mod timer;
pub mod world;
