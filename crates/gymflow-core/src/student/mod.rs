//! Student domain module.

mod model;
mod repository;

pub use model::{Student, StudentProfileUpdate};
pub use repository::StudentRepository;
