use crate::entities::grade;
use crate::error::ServiceError;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub struct GradeService;

pub struct NewGrade {
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub exam_name: String,
    pub exam_type: String,
    pub grade: f64,
    pub coefficient: f64,
    pub exam_date: NaiveDateTime,
    pub trimester: String,
    pub academic_year: String,
    pub comments: Option<String>,
    /// Derived from the grade value before the call.
    pub appreciation: String,
    pub school_id: Uuid,
}

#[derive(Default)]
pub struct GradeFilter {
    pub academic_year: Option<String>,
    pub trimester: Option<String>,
    pub subject_id: Option<Uuid>,
    pub exam_type: Option<String>,
}

impl GradeService {
    pub async fn create(
        db: &DatabaseConnection,
        new_grade: NewGrade,
    ) -> Result<grade::Model, ServiceError> {
        let duplicate = grade::Entity::find()
            .filter(grade::Column::StudentId.eq(new_grade.student_id))
            .filter(grade::Column::ClassId.eq(new_grade.class_id))
            .filter(grade::Column::SubjectId.eq(new_grade.subject_id))
            .filter(grade::Column::ExamName.eq(new_grade.exam_name.clone()))
            .filter(grade::Column::ExamType.eq(new_grade.exam_type.clone()))
            .filter(grade::Column::Trimester.eq(new_grade.trimester.clone()))
            .filter(grade::Column::AcademicYear.eq(new_grade.academic_year.clone()))
            .one(db)
            .await?
            .is_some();

        if duplicate {
            return Err(ServiceError::conflict(
                "Une note existe déjà pour cet élève et cet examen",
            ));
        }

        let now = Utc::now().naive_utc();
        let grade = grade::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(new_grade.student_id),
            class_id: Set(new_grade.class_id),
            subject_id: Set(new_grade.subject_id),
            teacher_id: Set(new_grade.teacher_id),
            exam_name: Set(new_grade.exam_name),
            exam_type: Set(new_grade.exam_type),
            grade: Set(new_grade.grade),
            coefficient: Set(new_grade.coefficient),
            exam_date: Set(new_grade.exam_date),
            trimester: Set(new_grade.trimester),
            academic_year: Set(new_grade.academic_year),
            comments: Set(new_grade.comments),
            appreciation: Set(new_grade.appreciation),
            school_id: Set(new_grade.school_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        Ok(grade)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<grade::Model>, DbErr> {
        grade::Entity::find_by_id(id).one(db).await
    }

    fn filter_condition(filter: GradeFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(academic_year) = filter.academic_year {
            condition = condition.add(grade::Column::AcademicYear.eq(academic_year));
        }
        if let Some(trimester) = filter.trimester {
            condition = condition.add(grade::Column::Trimester.eq(trimester));
        }
        if let Some(subject_id) = filter.subject_id {
            condition = condition.add(grade::Column::SubjectId.eq(subject_id));
        }
        if let Some(exam_type) = filter.exam_type {
            condition = condition.add(grade::Column::ExamType.eq(exam_type));
        }
        condition
    }

    pub async fn list_by_student(
        db: &DatabaseConnection,
        student_id: Uuid,
        filter: GradeFilter,
    ) -> Result<Vec<grade::Model>, DbErr> {
        grade::Entity::find()
            .filter(grade::Column::StudentId.eq(student_id))
            .filter(Self::filter_condition(filter))
            .order_by_desc(grade::Column::ExamDate)
            .all(db)
            .await
    }

    pub async fn list_by_class(
        db: &DatabaseConnection,
        class_id: Uuid,
        filter: GradeFilter,
    ) -> Result<Vec<grade::Model>, DbErr> {
        grade::Entity::find()
            .filter(grade::Column::ClassId.eq(class_id))
            .filter(Self::filter_condition(filter))
            .order_by_desc(grade::Column::ExamDate)
            .all(db)
            .await
    }

    /// Only the grade value and comments may change after creation; the
    /// appreciation is recomputed by the caller whenever the value changes.
    pub async fn update(
        db: &DatabaseConnection,
        grade: grade::Model,
        new_value: Option<(f64, String)>,
        comments: Option<String>,
    ) -> Result<grade::Model, DbErr> {
        let mut active: grade::ActiveModel = grade.into();
        if let Some((value, appreciation)) = new_value {
            active.grade = Set(value);
            active.appreciation = Set(appreciation);
        }
        if let Some(comments) = comments {
            active.comments = Set(Some(comments));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = grade::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Note non trouvée"));
        }
        Ok(())
    }
}
