//! Record store service for student grades.
//! - Persists the whole collection as a single JSON snapshot file.
//! - Every operation loads the snapshot fresh, mutates in memory and writes it back.
//! - Exposes the `StudentRepository` trait that the HTTP layer depends on.

pub mod errors;
pub mod grades;
pub mod storage;
pub mod students;
