//! Student records: domain types, the file-backed store and the repository seam.

pub mod domain;
pub mod repository;
pub mod store;

pub use domain::{CreateStudentInput, Student, UpdateStudentInput};
pub use repository::StudentRepository;
pub use store::StudentStore;
