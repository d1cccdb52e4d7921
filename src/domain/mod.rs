pub mod ai;
pub mod board;
pub mod entity;
pub mod maze;
pub mod rules;
pub mod tile;
