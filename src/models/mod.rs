pub mod category;
pub mod course;
pub mod resource;
pub mod session;
pub mod user;
