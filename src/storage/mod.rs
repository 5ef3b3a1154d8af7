pub mod backend;
pub mod journal;
pub mod store;
