pub mod config;
pub mod habit;
pub mod routine;
pub mod run;
