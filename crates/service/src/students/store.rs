use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::grades;
use crate::storage::json_snapshot_store::JsonSnapshotStore;
use crate::students::domain::{CreateStudentInput, Student, UpdateStudentInput};
use crate::students::repository::StudentRepository;

const ENTITY: &str = "Student";

/// File storage: student records persisted as one JSON array.
pub struct StudentStore {
    store: JsonSnapshotStore<Student>,
}

impl StudentStore {
    /// Open the snapshot at `path`, creating an empty one if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonSnapshotStore::<Student>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub async fn list(&self) -> Vec<Student> {
        self.store.read(|students| students.to_vec()).await
    }

    pub async fn get(&self, id: &str) -> Result<Student, ServiceError> {
        self.store
            .read(|students| students.iter().find(|s| s.id == id).cloned())
            .await
            .ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    pub async fn create(&self, input: CreateStudentInput) -> Result<Student, ServiceError> {
        let (name, grades) = input.validate()?;
        let student = self
            .store
            .update(|students| {
                let id = fresh_id(students);
                let student = Student { id, name, grades };
                students.push(student.clone());
                Ok(student)
            })
            .await?;
        info!(event = "student_created", id = %student.id, "student created");
        Ok(student)
    }

    pub async fn update(&self, id: &str, input: UpdateStudentInput) -> Result<Student, ServiceError> {
        let student = self
            .store
            .update(|students| {
                let existing = students
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| ServiceError::not_found(ENTITY))?;
                // unknown ids are reported before any body problem
                let (name, grades) = input.validate()?;
                if let Some(name) = name {
                    existing.name = name;
                }
                if let Some(grades) = grades {
                    existing.grades = grades;
                }
                Ok(existing.clone())
            })
            .await?;
        info!(event = "student_updated", %id, "student updated");
        Ok(student)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.store
            .update(|students| {
                let before = students.len();
                students.retain(|s| s.id != id);
                if students.len() == before {
                    return Err(ServiceError::not_found(ENTITY));
                }
                Ok(())
            })
            .await?;
        info!(event = "student_deleted", %id, "student deleted");
        Ok(())
    }

    pub async fn student_average(&self, id: &str) -> Result<Option<f64>, ServiceError> {
        let student = self.get(id).await?;
        Ok(grades::mean(student.grades))
    }

    pub async fn class_average(&self) -> Option<f64> {
        self.store
            .read(|students| grades::mean(students.iter().flat_map(|s| s.grades.iter().copied())))
            .await
    }
}

/// v4 ids practically never collide; the loop keeps ids unique even against
/// a hand-edited snapshot.
fn fresh_id(students: &[Student]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !students.iter().any(|s| s.id == id) {
            return id;
        }
    }
}

#[async_trait]
impl StudentRepository for StudentStore {
    async fn list(&self) -> Vec<Student> { self.list().await }
    async fn get(&self, id: &str) -> Result<Student, ServiceError> { self.get(id).await }
    async fn create(&self, input: CreateStudentInput) -> Result<Student, ServiceError> { self.create(input).await }
    async fn update(&self, id: &str, input: UpdateStudentInput) -> Result<Student, ServiceError> { self.update(id, input).await }
    async fn delete(&self, id: &str) -> Result<(), ServiceError> { self.delete(id).await }
    async fn student_average(&self, id: &str) -> Result<Option<f64>, ServiceError> { self.student_average(id).await }
    async fn class_average(&self) -> Option<f64> { self.class_average().await }
}
