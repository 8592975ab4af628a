use crate::entities::{exercise, student_progress};
use crate::error::ServiceError;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde_json::Value as Json;
use uuid::Uuid;

pub struct ExerciseService;

pub struct NewExercise {
    pub title: String,
    pub kind: String,
    pub subject_id: Uuid,
    pub class_id: Uuid,
    pub created_by: Uuid,
    pub school_id: Uuid,
    pub difficulty: String,
    pub qcm_questions: Json,
    pub fill_blank_questions: Json,
    pub total_points: f64,
    pub metadata: Json,
    pub tags: Json,
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Default)]
pub struct ExerciseListFilter {
    pub school_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub kind: Option<String>,
    pub difficulty: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Mutable subset of an exercise. Class, subject and creator are fixed at
/// creation time.
#[derive(Default)]
pub struct ExerciseChanges {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub is_active: Option<bool>,
    pub qcm_questions: Option<Json>,
    pub fill_blank_questions: Option<Json>,
    pub total_points: Option<f64>,
    pub metadata: Option<Json>,
    pub tags: Option<Json>,
    pub due_date: Option<Option<NaiveDateTime>>,
}

impl ExerciseService {
    pub async fn create(
        db: &DatabaseConnection,
        new_exercise: NewExercise,
    ) -> Result<exercise::Model, DbErr> {
        let now = Utc::now().naive_utc();
        exercise::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_exercise.title),
            kind: Set(new_exercise.kind),
            subject_id: Set(new_exercise.subject_id),
            class_id: Set(new_exercise.class_id),
            created_by: Set(new_exercise.created_by),
            school_id: Set(new_exercise.school_id),
            difficulty: Set(new_exercise.difficulty),
            is_active: Set(true),
            qcm_questions: Set(new_exercise.qcm_questions),
            fill_blank_questions: Set(new_exercise.fill_blank_questions),
            total_points: Set(new_exercise.total_points),
            metadata: Set(new_exercise.metadata),
            tags: Set(new_exercise.tags),
            due_date: Set(new_exercise.due_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<exercise::Model>, DbErr> {
        exercise::Entity::find_by_id(id).one(db).await
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: ExerciseListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<exercise::Model>, u64), DbErr> {
        let mut condition = Condition::all().add(exercise::Column::IsActive.eq(true));
        if let Some(school_id) = filter.school_id {
            condition = condition.add(exercise::Column::SchoolId.eq(school_id));
        }
        if let Some(class_id) = filter.class_id {
            condition = condition.add(exercise::Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = filter.subject_id {
            condition = condition.add(exercise::Column::SubjectId.eq(subject_id));
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(exercise::Column::Kind.eq(kind));
        }
        if let Some(difficulty) = filter.difficulty {
            condition = condition.add(exercise::Column::Difficulty.eq(difficulty));
        }
        if let Some(created_by) = filter.created_by {
            condition = condition.add(exercise::Column::CreatedBy.eq(created_by));
        }

        let query = exercise::Entity::find()
            .filter(condition)
            .order_by_desc(exercise::Column::CreatedAt);

        let total = query.clone().count(db).await?;
        let exercises = query.paginate(db, limit).fetch_page(page - 1).await?;
        Ok((exercises, total))
    }

    pub async fn update(
        db: &DatabaseConnection,
        exercise: exercise::Model,
        changes: ExerciseChanges,
    ) -> Result<exercise::Model, DbErr> {
        let mut active: exercise::ActiveModel = exercise.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(difficulty) = changes.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(qcm_questions) = changes.qcm_questions {
            active.qcm_questions = Set(qcm_questions);
        }
        if let Some(fill_blank_questions) = changes.fill_blank_questions {
            active.fill_blank_questions = Set(fill_blank_questions);
        }
        if let Some(total_points) = changes.total_points {
            active.total_points = Set(total_points);
        }
        if let Some(metadata) = changes.metadata {
            active.metadata = Set(metadata);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(tags);
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = Set(due_date);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    /// Hard delete; returns how many progress rows went with it.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<u64, ServiceError> {
        let progress_count = student_progress::Entity::find()
            .filter(student_progress::Column::ExerciseId.eq(id))
            .count(db)
            .await?;

        let result = exercise::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Exercise not found"));
        }
        Ok(progress_count)
    }
}
