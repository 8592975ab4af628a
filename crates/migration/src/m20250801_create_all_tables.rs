use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create schools table. The admin reference stays an unconstrained
        // uuid to avoid a circular foreign key with users.
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schools::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(ColumnDef::new(Schools::AdminId).uuid())
                    .col(
                        ColumnDef::new(Schools::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Schools::BlockedReason).text())
                    .col(ColumnDef::new(Schools::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Schools::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::SchoolId).uuid())
                    .col(ColumnDef::new(Users::StudentClassId).uuid())
                    .col(ColumnDef::new(Users::CreatedBy).uuid())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-school_id")
                            .from(Users::Table, Users::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create classes table
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::GradeLabel).string().not_null())
                    .col(ColumnDef::new(Classes::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(Classes::AcademicYear).string().not_null())
                    .col(
                        ColumnDef::new(Classes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Classes::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-classes-school_id")
                            .from(Classes::Table, Classes::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A student belongs to at most one class; added after classes exists.
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk-users-student_class_id")
                    .from(Users::Table, Users::StudentClassId)
                    .to(Classes::Table, Classes::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().not_null())
                    .col(ColumnDef::new(Subjects::ImagePath).string())
                    .col(ColumnDef::new(Subjects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create teacher_subjects junction table: one row per
        // (class, teacher, subject) teaching assignment.
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeacherSubjects::ClassId).uuid().not_null())
                    .col(ColumnDef::new(TeacherSubjects::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TeacherSubjects::SubjectId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-class_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-teacher_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-subject_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create exercises table
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Exercises::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Exercises::Title).string().not_null())
                    .col(ColumnDef::new(Exercises::Kind).string().not_null())
                    .col(ColumnDef::new(Exercises::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Exercises::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Exercises::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Exercises::SchoolId).uuid().not_null())
                    .col(
                        ColumnDef::new(Exercises::Difficulty)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Exercises::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Exercises::QcmQuestions).json().not_null())
                    .col(
                        ColumnDef::new(Exercises::FillBlankQuestions)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exercises::TotalPoints)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Exercises::Metadata).json().not_null())
                    .col(ColumnDef::new(Exercises::Tags).json().not_null())
                    .col(ColumnDef::new(Exercises::DueDate).timestamp())
                    .col(ColumnDef::new(Exercises::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Exercises::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercises-subject_id")
                            .from(Exercises::Table, Exercises::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercises-class_id")
                            .from(Exercises::Table, Exercises::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercises-created_by")
                            .from(Exercises::Table, Exercises::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exercises-school_id")
                            .from(Exercises::Table, Exercises::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create student_progress table
        manager
            .create_table(
                Table::create()
                    .table(StudentProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProgress::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentProgress::StudentId).uuid().not_null())
                    .col(ColumnDef::new(StudentProgress::ExerciseId).uuid().not_null())
                    .col(ColumnDef::new(StudentProgress::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(StudentProgress::ClassId).uuid().not_null())
                    .col(
                        ColumnDef::new(StudentProgress::QcmAnswers)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::FillBlankAnswers)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::TotalPointsEarned)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::MaxPossiblePoints)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::AccuracyPercentage)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::StartedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::CompletedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::TimeSpentSecs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProgress::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_progress-student_id")
                            .from(StudentProgress::Table, StudentProgress::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_progress-exercise_id")
                            .from(StudentProgress::Table, StudentProgress::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_progress-subject_id")
                            .from(StudentProgress::Table, StudentProgress::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_progress-class_id")
                            .from(StudentProgress::Table, StudentProgress::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grades table
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Grades::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Grades::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Grades::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Grades::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Grades::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Grades::ExamName).string().not_null())
                    .col(ColumnDef::new(Grades::ExamType).string().not_null())
                    .col(ColumnDef::new(Grades::Grade).double().not_null())
                    .col(
                        ColumnDef::new(Grades::Coefficient)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Grades::ExamDate).timestamp().not_null())
                    .col(ColumnDef::new(Grades::Trimester).string().not_null())
                    .col(ColumnDef::new(Grades::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Grades::Comments).text())
                    .col(ColumnDef::new(Grades::Appreciation).string().not_null())
                    .col(ColumnDef::new(Grades::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(Grades::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-student_id")
                            .from(Grades::Table, Grades::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-class_id")
                            .from(Grades::Table, Grades::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-subject_id")
                            .from(Grades::Table, Grades::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-teacher_id")
                            .from(Grades::Table, Grades::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-school_id")
                            .from(Grades::Table, Grades::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Kind)
                            .string()
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Notifications::TargetAudience)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::TargetClassId).uuid())
                    .col(ColumnDef::new(Notifications::Attachments).json().not_null())
                    .col(
                        ColumnDef::new(Notifications::PublishDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::ExpiryDate).timestamp())
                    .col(
                        ColumnDef::new(Notifications::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Notifications::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Notifications::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Notifications::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-target_class_id")
                            .from(Notifications::Table, Notifications::TargetClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-created_by")
                            .from(Notifications::Table, Notifications::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notification_reads table: one row per user who has read a
        // notification, duplicates impossible by unique key.
        manager
            .create_table(
                Table::create()
                    .table(NotificationReads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationReads::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationReads::NotificationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationReads::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(NotificationReads::ReadAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification_reads-notification_id")
                            .from(NotificationReads::Table, NotificationReads::NotificationId)
                            .to(Notifications::Table, Notifications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notification_reads-user_id")
                            .from(NotificationReads::Table, NotificationReads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create chats table
        manager
            .create_table(
                Table::create()
                    .table(Chats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Chats::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Chats::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(Chats::Title)
                            .string()
                            .not_null()
                            .default("New Chat"),
                    )
                    .col(
                        ColumnDef::new(Chats::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Chats::LastMessageAt).timestamp().not_null())
                    .col(ColumnDef::new(Chats::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Chats::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-chats-student_id")
                            .from(Chats::Table, Chats::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create chat_messages table
        manager
            .create_table(
                Table::create()
                    .table(ChatMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatMessages::ChatId).uuid().not_null())
                    .col(ColumnDef::new(ChatMessages::Role).string().not_null())
                    .col(ColumnDef::new(ChatMessages::Content).text().not_null())
                    .col(ColumnDef::new(ChatMessages::SentAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-chat_messages-chat_id")
                            .from(ChatMessages::Table, ChatMessages::ChatId)
                            .to(Chats::Table, Chats::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create contacts table
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string().not_null())
                    .col(ColumnDef::new(Contacts::Phone).string().not_null())
                    .col(ColumnDef::new(Contacts::Message).text().not_null())
                    .col(ColumnDef::new(Contacts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ChatMessages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Chats::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NotificationReads::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentProgress::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name("fk-users-student_class_id")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Schools {
    Table,
    Id,
    Name,
    AdminId,
    IsActive,
    BlockedReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    SchoolId,
    StudentClassId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
    Name,
    GradeLabel,
    SchoolId,
    AcademicYear,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    Name,
    Description,
    ImagePath,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TeacherSubjects {
    Table,
    Id,
    ClassId,
    TeacherId,
    SubjectId,
}

#[derive(Iden)]
enum Exercises {
    Table,
    Id,
    Title,
    Kind,
    SubjectId,
    ClassId,
    CreatedBy,
    SchoolId,
    Difficulty,
    IsActive,
    QcmQuestions,
    FillBlankQuestions,
    TotalPoints,
    Metadata,
    Tags,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentProgress {
    Table,
    Id,
    StudentId,
    ExerciseId,
    SubjectId,
    ClassId,
    QcmAnswers,
    FillBlankAnswers,
    TotalPointsEarned,
    MaxPossiblePoints,
    AccuracyPercentage,
    StartedAt,
    CompletedAt,
    TimeSpentSecs,
    AttemptNumber,
    CreatedAt,
}

#[derive(Iden)]
enum Grades {
    Table,
    Id,
    StudentId,
    ClassId,
    SubjectId,
    TeacherId,
    ExamName,
    ExamType,
    Grade,
    Coefficient,
    ExamDate,
    Trimester,
    AcademicYear,
    Comments,
    Appreciation,
    SchoolId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Title,
    Content,
    Kind,
    Priority,
    TargetAudience,
    TargetClassId,
    Attachments,
    PublishDate,
    ExpiryDate,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum NotificationReads {
    Table,
    Id,
    NotificationId,
    UserId,
    ReadAt,
}

#[derive(Iden)]
enum Chats {
    Table,
    Id,
    StudentId,
    Title,
    IsActive,
    LastMessageAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ChatMessages {
    Table,
    Id,
    ChatId,
    Role,
    Content,
    SentAt,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Message,
    CreatedAt,
}
