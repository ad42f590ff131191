//! Student repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::students;

/// Input for registering a student.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// The campus the student enrolls at.
    pub campus_id: Uuid,
    /// Campus-unique student code.
    pub student_code: String,
    /// Full name.
    pub full_name: String,
    /// Grade, if known.
    pub grade: Option<String>,
    /// Guardian name, if known.
    pub guardian_name: Option<String>,
    /// Guardian phone, if known.
    pub guardian_phone: Option<String>,
}

/// Filter options for listing students.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Filter by grade.
    pub grade: Option<String>,
    /// Include deactivated students.
    pub include_inactive: bool,
}

/// Student repository.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    /// Creates a new student repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a student at a campus.
    pub async fn create(&self, input: CreateStudentInput) -> Result<students::Model, DbErr> {
        let now = Utc::now().into();
        let student = students::ActiveModel {
            id: Set(Uuid::now_v7()),
            campus_id: Set(input.campus_id),
            student_code: Set(input.student_code),
            full_name: Set(input.full_name),
            grade: Set(input.grade),
            guardian_name: Set(input.guardian_name),
            guardian_phone: Set(input.guardian_phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        student.insert(&self.db).await
    }

    /// Finds a student by id. The caller checks campus ownership so a
    /// cross-campus probe answers Forbidden rather than NotFound.
    pub async fn find(&self, student_id: Uuid) -> Result<Option<students::Model>, DbErr> {
        students::Entity::find_by_id(student_id).one(&self.db).await
    }

    /// Lists students within a campus.
    pub async fn list(
        &self,
        campus_id: Uuid,
        filter: StudentFilter,
    ) -> Result<Vec<students::Model>, DbErr> {
        let mut query = students::Entity::find()
            .filter(students::Column::CampusId.eq(campus_id))
            .order_by_asc(students::Column::StudentCode);

        if !filter.include_inactive {
            query = query.filter(students::Column::IsActive.eq(true));
        }
        if let Some(grade) = filter.grade {
            query = query.filter(students::Column::Grade.eq(grade));
        }

        query.all(&self.db).await
    }
}
