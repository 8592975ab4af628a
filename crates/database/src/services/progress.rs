use crate::entities::student_progress;
use crate::error::ServiceError;
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde_json::Value as Json;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ProgressService;

pub struct NewSubmission {
    pub student_id: Uuid,
    pub exercise_id: Uuid,
    pub subject_id: Uuid,
    pub class_id: Uuid,
    pub qcm_answers: Json,
    pub fill_blank_answers: Json,
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    pub started_at: NaiveDateTime,
    pub completed_at: NaiveDateTime,
    /// From the exercise metadata; default 3.
    pub max_attempts: u32,
}

#[derive(Default)]
pub struct ProgressFilter {
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl ProgressService {
    /// Records a submission, enforcing the attempt limit atomically: the
    /// attempt number is assigned inside a transaction and the unique
    /// (student, exercise, attempt_number) key makes a racing duplicate
    /// fail instead of slipping past the limit.
    pub async fn record_submission(
        db: &DatabaseConnection,
        submission: NewSubmission,
    ) -> Result<student_progress::Model, ServiceError> {
        let txn = db.begin().await?;

        let previous_attempts = student_progress::Entity::find()
            .filter(student_progress::Column::StudentId.eq(submission.student_id))
            .filter(student_progress::Column::ExerciseId.eq(submission.exercise_id))
            .count(&txn)
            .await?;

        if !models::scoring::can_attempt(previous_attempts, submission.max_attempts) {
            return Err(ServiceError::validation(
                "Maximum attempts reached for this exercise",
            ));
        }

        let now = Utc::now().naive_utc();
        let time_spent_secs = (submission.completed_at - submission.started_at)
            .num_seconds()
            .max(0);
        let row = student_progress::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(submission.student_id),
            exercise_id: Set(submission.exercise_id),
            subject_id: Set(submission.subject_id),
            class_id: Set(submission.class_id),
            qcm_answers: Set(submission.qcm_answers),
            fill_blank_answers: Set(submission.fill_blank_answers),
            total_points_earned: Set(submission.total_points_earned),
            max_possible_points: Set(submission.max_possible_points),
            accuracy_percentage: Set(submission.accuracy_percentage),
            started_at: Set(submission.started_at),
            completed_at: Set(submission.completed_at),
            time_spent_secs: Set(time_spent_secs),
            attempt_number: Set(previous_attempts as i32 + 1),
            created_at: Set(now),
        };

        let insert = student_progress::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    student_progress::Column::StudentId,
                    student_progress::Column::ExerciseId,
                    student_progress::Column::AttemptNumber,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&txn)
            .await;

        let inserted_id = match insert {
            Ok(result) => result.last_insert_id,
            // Another submission claimed this attempt slot concurrently.
            Err(DbErr::RecordNotInserted) => {
                return Err(ServiceError::conflict(
                    "A submission for this attempt was already recorded",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let model = student_progress::Entity::find_by_id(inserted_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Progress record not found"))?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<student_progress::Model>, DbErr> {
        student_progress::Entity::find_by_id(id).one(db).await
    }

    fn filter_condition(filter: ProgressFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(subject_id) = filter.subject_id {
            condition = condition.add(student_progress::Column::SubjectId.eq(subject_id));
        }
        if let Some(class_id) = filter.class_id {
            condition = condition.add(student_progress::Column::ClassId.eq(class_id));
        }
        if let Some(exercise_id) = filter.exercise_id {
            condition = condition.add(student_progress::Column::ExerciseId.eq(exercise_id));
        }
        if let Some(from) = filter.date_from {
            condition = condition.add(student_progress::Column::CompletedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            condition = condition.add(student_progress::Column::CompletedAt.lte(to));
        }
        condition
    }

    pub async fn list_by_student(
        db: &DatabaseConnection,
        student_id: Uuid,
        filter: ProgressFilter,
    ) -> Result<Vec<student_progress::Model>, DbErr> {
        student_progress::Entity::find()
            .filter(student_progress::Column::StudentId.eq(student_id))
            .filter(Self::filter_condition(filter))
            .order_by_desc(student_progress::Column::CompletedAt)
            .all(db)
            .await
    }

    pub async fn list_by_class(
        db: &DatabaseConnection,
        class_id: Uuid,
        filter: ProgressFilter,
    ) -> Result<Vec<student_progress::Model>, DbErr> {
        student_progress::Entity::find()
            .filter(student_progress::Column::ClassId.eq(class_id))
            .filter(Self::filter_condition(filter))
            .order_by_desc(student_progress::Column::CompletedAt)
            .all(db)
            .await
    }

    pub async fn list_by_exercise(
        db: &DatabaseConnection,
        exercise_id: Uuid,
    ) -> Result<Vec<student_progress::Model>, DbErr> {
        student_progress::Entity::find()
            .filter(student_progress::Column::ExerciseId.eq(exercise_id))
            .order_by_desc(student_progress::Column::CompletedAt)
            .all(db)
            .await
    }

    /// All attempts of one student on one exercise, oldest first.
    pub async fn attempts(
        db: &DatabaseConnection,
        student_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Vec<student_progress::Model>, DbErr> {
        student_progress::Entity::find()
            .filter(student_progress::Column::StudentId.eq(student_id))
            .filter(student_progress::Column::ExerciseId.eq(exercise_id))
            .order_by_asc(student_progress::Column::AttemptNumber)
            .all(db)
            .await
    }

    pub async fn count_attempts(
        db: &DatabaseConnection,
        student_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<u64, DbErr> {
        student_progress::Entity::find()
            .filter(student_progress::Column::StudentId.eq(student_id))
            .filter(student_progress::Column::ExerciseId.eq(exercise_id))
            .count(db)
            .await
    }

    /// Latest attempt per exercise for one student, for list views.
    pub async fn latest_by_exercise(
        db: &DatabaseConnection,
        student_id: Uuid,
        exercise_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, student_progress::Model>, DbErr> {
        if exercise_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = student_progress::Entity::find()
            .filter(student_progress::Column::StudentId.eq(student_id))
            .filter(student_progress::Column::ExerciseId.is_in(exercise_ids))
            .all(db)
            .await?;

        let mut latest: HashMap<Uuid, student_progress::Model> = HashMap::new();
        for row in rows {
            match latest.get(&row.exercise_id) {
                Some(existing) if existing.attempt_number >= row.attempt_number => {}
                _ => {
                    latest.insert(row.exercise_id, row);
                }
            }
        }
        Ok(latest)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = student_progress::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Progress record not found"));
        }
        Ok(())
    }
}
