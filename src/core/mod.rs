pub mod alphabet;
pub mod engine;
pub mod generator;
pub mod parser;
pub mod render;
pub mod samples;
pub mod types;
