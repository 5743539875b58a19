pub mod cell;
pub mod direction;
pub mod error;
pub mod generator;
pub mod grid;
pub mod rules;
