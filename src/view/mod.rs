pub mod projector;
pub mod screen;
