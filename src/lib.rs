pub mod config;
pub mod errors;
pub mod models;
pub mod seed;
pub mod services;
pub mod storage;
