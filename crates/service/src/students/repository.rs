use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::students::domain::{CreateStudentInput, Student, UpdateStudentInput};

/// Trait abstraction over student record storage, injected into HTTP handlers.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn list(&self) -> Vec<Student>;
    async fn get(&self, id: &str) -> Result<Student, ServiceError>;
    async fn create(&self, input: CreateStudentInput) -> Result<Student, ServiceError>;
    async fn update(&self, id: &str, input: UpdateStudentInput) -> Result<Student, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
    /// Mean of one student's grades; `Ok(None)` when they have none.
    async fn student_average(&self, id: &str) -> Result<Option<f64>, ServiceError>;
    /// Mean over every grade of every student; `None` when there are none.
    async fn class_average(&self) -> Option<f64>;
}
