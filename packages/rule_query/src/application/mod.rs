pub mod cli;
pub mod demo;
pub mod runner;
pub mod transcript;
