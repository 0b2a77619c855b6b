pub mod audit;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod export;
pub mod scanner;
pub mod selector;
