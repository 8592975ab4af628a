use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Uniqueness constraints
        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_name")
                    .table(Subjects::Table)
                    .col(Subjects::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_subjects_unique")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::ClassId)
                    .col(TeacherSubjects::TeacherId)
                    .col(TeacherSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One row per (student, exercise, attempt); a concurrent double
        // submit for the same attempt slot violates this key.
        manager
            .create_index(
                Index::create()
                    .name("idx_student_progress_attempt_unique")
                    .table(StudentProgress::Table)
                    .col(StudentProgress::StudentId)
                    .col(StudentProgress::ExerciseId)
                    .col(StudentProgress::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grades_exam_unique")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::ClassId)
                    .col(Grades::SubjectId)
                    .col(Grades::ExamName)
                    .col(Grades::ExamType)
                    .col(Grades::Trimester)
                    .col(Grades::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_reads_unique")
                    .table(NotificationReads::Table)
                    .col(NotificationReads::NotificationId)
                    .col(NotificationReads::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for common query patterns
        manager
            .create_index(
                Index::create()
                    .name("idx_users_school_role")
                    .table(Users::Table)
                    .col(Users::SchoolId)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_student_class")
                    .table(Users::Table)
                    .col(Users::StudentClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_classes_school_year")
                    .table(Classes::Table)
                    .col(Classes::SchoolId)
                    .col(Classes::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_subjects_teacher")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_class_subject_active")
                    .table(Exercises::Table)
                    .col(Exercises::ClassId)
                    .col(Exercises::SubjectId)
                    .col(Exercises::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_created_by")
                    .table(Exercises::Table)
                    .col(Exercises::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_progress_class_subject")
                    .table(StudentProgress::Table)
                    .col(StudentProgress::ClassId)
                    .col(StudentProgress::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grades_student_subject_year")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::SubjectId)
                    .col(Grades::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grades_class_subject_type")
                    .table(Grades::Table)
                    .col(Grades::ClassId)
                    .col(Grades::SubjectId)
                    .col(Grades::ExamType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_publish_date")
                    .table(Notifications::Table)
                    .col(Notifications::PublishDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_target_class")
                    .table(Notifications::Table)
                    .col(Notifications::TargetClassId)
                    .col(Notifications::PublishDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chats_student_active")
                    .table(Chats::Table)
                    .col(Chats::StudentId)
                    .col(Chats::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_messages_chat_sent")
                    .table(ChatMessages::Table)
                    .col(ChatMessages::ChatId)
                    .col(ChatMessages::SentAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_chat_messages_chat_sent",
            "idx_chats_student_active",
            "idx_notifications_target_class",
            "idx_notifications_publish_date",
            "idx_grades_class_subject_type",
            "idx_grades_student_subject_year",
            "idx_student_progress_class_subject",
            "idx_exercises_created_by",
            "idx_exercises_class_subject_active",
            "idx_teacher_subjects_teacher",
            "idx_classes_school_year",
            "idx_users_student_class",
            "idx_users_school_role",
            "idx_notification_reads_unique",
            "idx_grades_exam_unique",
            "idx_student_progress_attempt_unique",
            "idx_teacher_subjects_unique",
            "idx_subjects_name",
            "idx_users_email",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Email,
    SchoolId,
    Role,
    StudentClassId,
}

#[derive(Iden)]
enum Classes {
    Table,
    SchoolId,
    AcademicYear,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Name,
}

#[derive(Iden)]
enum TeacherSubjects {
    Table,
    ClassId,
    TeacherId,
    SubjectId,
}

#[derive(Iden)]
enum Exercises {
    Table,
    ClassId,
    SubjectId,
    IsActive,
    CreatedBy,
}

#[derive(Iden)]
enum StudentProgress {
    Table,
    StudentId,
    ExerciseId,
    AttemptNumber,
    ClassId,
    SubjectId,
}

#[derive(Iden)]
enum Grades {
    Table,
    StudentId,
    ClassId,
    SubjectId,
    ExamName,
    ExamType,
    Trimester,
    AcademicYear,
}

#[derive(Iden)]
enum Notifications {
    Table,
    PublishDate,
    TargetClassId,
}

#[derive(Iden)]
enum NotificationReads {
    Table,
    NotificationId,
    UserId,
}

#[derive(Iden)]
enum Chats {
    Table,
    StudentId,
    IsActive,
}

#[derive(Iden)]
enum ChatMessages {
    Table,
    ChatId,
    SentAt,
}
