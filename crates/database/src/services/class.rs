use crate::entities::{class, exercise, subject, teacher_subject, user};
use crate::error::ServiceError;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct ClassService;

#[derive(Default)]
pub struct ClassListFilter {
    pub school_id: Option<Uuid>,
    pub grade_label: Option<String>,
    pub academic_year: Option<String>,
    /// Restrict to classes this teacher teaches.
    pub teacher_id: Option<Uuid>,
    /// Restrict to this single class (a student's own).
    pub class_id: Option<Uuid>,
}

pub struct ClassStatistics {
    pub total_exercises: u64,
    pub total_students: u64,
    pub total_teachers: u64,
}

impl ClassService {
    pub async fn create(
        db: &DatabaseConnection,
        name: String,
        grade_label: String,
        school_id: Uuid,
        academic_year: String,
        created_by: Uuid,
    ) -> Result<class::Model, DbErr> {
        let now = Utc::now().naive_utc();
        class::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            grade_label: Set(grade_label),
            school_id: Set(school_id),
            academic_year: Set(academic_year),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<class::Model>, DbErr> {
        class::Entity::find_by_id(id).one(db).await
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: ClassListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<class::Model>, u64), DbErr> {
        let mut condition = Condition::all();
        if let Some(school_id) = filter.school_id {
            condition = condition.add(class::Column::SchoolId.eq(school_id));
        }
        if let Some(grade_label) = filter.grade_label {
            condition = condition.add(class::Column::GradeLabel.eq(grade_label));
        }
        if let Some(academic_year) = filter.academic_year {
            condition = condition.add(class::Column::AcademicYear.eq(academic_year));
        }
        if let Some(class_id) = filter.class_id {
            condition = condition.add(class::Column::Id.eq(class_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            let taught: Vec<Uuid> = teacher_subject::Entity::find()
                .filter(teacher_subject::Column::TeacherId.eq(teacher_id))
                .all(db)
                .await?
                .into_iter()
                .map(|row| row.class_id)
                .collect();
            condition = condition.add(class::Column::Id.is_in(taught));
        }

        let query = class::Entity::find()
            .filter(condition)
            .order_by_desc(class::Column::CreatedAt);

        let total = query.clone().count(db).await?;
        let classes = query.paginate(db, limit).fetch_page(page - 1).await?;
        Ok((classes, total))
    }

    pub async fn statistics(
        db: &DatabaseConnection,
        class_id: Uuid,
    ) -> Result<ClassStatistics, DbErr> {
        let total_exercises = exercise::Entity::find()
            .filter(exercise::Column::ClassId.eq(class_id))
            .count(db)
            .await?;
        let total_students = user::Entity::find()
            .filter(user::Column::StudentClassId.eq(class_id))
            .filter(user::Column::Role.eq("student"))
            .count(db)
            .await?;

        // Distinct teachers assigned to the class.
        let mut teacher_ids: Vec<Uuid> = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::ClassId.eq(class_id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.teacher_id)
            .collect();
        teacher_ids.sort();
        teacher_ids.dedup();

        Ok(ClassStatistics {
            total_exercises,
            total_students,
            total_teachers: teacher_ids.len() as u64,
        })
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        name: Option<String>,
        grade_label: Option<String>,
        academic_year: Option<String>,
        is_active: Option<bool>,
    ) -> Result<class::Model, ServiceError> {
        let class = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Class not found"))?;

        let mut active: class::ActiveModel = class.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(grade_label) = grade_label {
            active.grade_label = Set(grade_label);
        }
        if let Some(academic_year) = academic_year {
            active.academic_year = Set(academic_year);
        }
        if let Some(is_active) = is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    /// Exercises, progress, grades, teaching assignments and notifications
    /// cascade through foreign keys; enrolled students are detached.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = class::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Class not found"));
        }
        Ok(())
    }

    pub async fn add_student(
        db: &DatabaseConnection,
        class_id: Uuid,
        student: user::Model,
    ) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = student.into();
        active.student_class_id = Set(Some(class_id));
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    pub async fn remove_student(
        db: &DatabaseConnection,
        class_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), ServiceError> {
        let student = user::Entity::find_by_id(student_id)
            .filter(user::Column::StudentClassId.eq(class_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student not found in this class"))?;

        let mut active: user::ActiveModel = student.into();
        active.student_class_id = Set(None);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;
        Ok(())
    }

    pub async fn students(
        db: &DatabaseConnection,
        class_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), DbErr> {
        let query = user::Entity::find()
            .filter(user::Column::StudentClassId.eq(class_id))
            .filter(user::Column::Role.eq("student"))
            .order_by_asc(user::Column::Name);

        let total = query.clone().count(db).await?;
        let students = query.paginate(db, limit).fetch_page(page - 1).await?;
        Ok((students, total))
    }

    /// Adds the given subjects to a teacher's assignment in the class.
    /// Subjects accumulate; a teacher appears at most once per subject.
    pub async fn assign_teacher(
        db: &DatabaseConnection,
        class_id: Uuid,
        teacher_id: Uuid,
        subject_ids: Vec<Uuid>,
    ) -> Result<(), DbErr> {
        let rows: Vec<teacher_subject::ActiveModel> = subject_ids
            .into_iter()
            .map(|subject_id| teacher_subject::ActiveModel {
                id: Set(Uuid::new_v4()),
                class_id: Set(class_id),
                teacher_id: Set(teacher_id),
                subject_id: Set(subject_id),
            })
            .collect();

        if rows.is_empty() {
            return Ok(());
        }

        let insert = teacher_subject::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    teacher_subject::Column::ClassId,
                    teacher_subject::Column::TeacherId,
                    teacher_subject::Column::SubjectId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(db)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn remove_teacher(
        db: &DatabaseConnection,
        class_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<(), DbErr> {
        teacher_subject::Entity::delete_many()
            .filter(teacher_subject::Column::ClassId.eq(class_id))
            .filter(teacher_subject::Column::TeacherId.eq(teacher_id))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Teachers of a class with the subjects each one teaches there.
    pub async fn teachers(
        db: &DatabaseConnection,
        class_id: Uuid,
    ) -> Result<Vec<(user::Model, Vec<subject::Model>)>, DbErr> {
        let assignments = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::ClassId.eq(class_id))
            .all(db)
            .await?;

        if assignments.is_empty() {
            return Ok(vec![]);
        }

        let teacher_ids: Vec<Uuid> = assignments.iter().map(|a| a.teacher_id).collect();
        let subject_ids: Vec<Uuid> = assignments.iter().map(|a| a.subject_id).collect();

        let teachers: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(teacher_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let subjects: HashMap<Uuid, subject::Model> = subject::Entity::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut subjects_by_teacher: HashMap<Uuid, Vec<subject::Model>> = HashMap::new();
        for assignment in assignments {
            if let Some(subject) = subjects.get(&assignment.subject_id) {
                subjects_by_teacher
                    .entry(assignment.teacher_id)
                    .or_default()
                    .push(subject.clone());
            }
        }

        let mut result = Vec::new();
        for (teacher_id, taught) in subjects_by_teacher {
            if let Some(teacher) = teachers.get(&teacher_id) {
                result.push((teacher.clone(), taught));
            }
        }
        result.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        Ok(result)
    }

    /// Flattened teaching assignments of a class, for access checks.
    pub async fn teaching_assignments(
        db: &DatabaseConnection,
        class_id: Uuid,
    ) -> Result<Vec<teacher_subject::Model>, DbErr> {
        teacher_subject::Entity::find()
            .filter(teacher_subject::Column::ClassId.eq(class_id))
            .all(db)
            .await
    }
}
