pub mod core;
pub mod models;
pub mod storage;
pub mod collections;
pub mod codec;
pub mod auth;
pub mod utils;
