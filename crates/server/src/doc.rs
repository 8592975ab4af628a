use crate::routes::{
    chat, class, contact, exercise, grade, health, notification, progress, root, school, subject,
    user,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        school::create_school,
        school::get_school,
        school::toggle_access,
        school::rename_school,
        user::login,
        user::get_profile,
        user::create_user,
        user::list_users,
        user::get_user,
        user::update_user,
        user::delete_user,
        user::change_password,
        subject::create_subject,
        subject::list_subjects,
        subject::get_subject,
        subject::update_subject,
        subject::delete_subject,
        class::create_class,
        class::list_classes,
        class::get_class,
        class::update_class,
        class::delete_class,
        class::add_student,
        class::remove_student,
        class::assign_teacher,
        class::remove_teacher,
        class::list_students,
        class::list_teachers,
        exercise::create_exercise,
        exercise::list_exercises,
        exercise::get_exercise,
        exercise::update_exercise,
        exercise::delete_exercise,
        exercise::submit_exercise,
        exercise::get_exercise_progress,
        exercise::exercises_by_subject,
        grade::create_grade,
        grade::get_grades_by_student,
        grade::get_student_report,
        grade::get_grades_by_class,
        grade::update_grade,
        grade::delete_grade,
        progress::student_overview,
        progress::class_progress,
        progress::exercise_analytics,
        progress::delete_progress,
        notification::create_notification,
        notification::list_notifications,
        notification::notification_stats,
        notification::get_notification,
        notification::mark_as_read,
        notification::update_notification,
        notification::delete_notification,
        notification::view_attachment,
        notification::download_attachment,
        chat::create_chat,
        chat::list_chats,
        chat::get_chat,
        chat::send_message,
        chat::update_chat_title,
        chat::delete_chat,
        contact::create_contact,
        contact::list_contacts,
        contact::get_contact,
        contact::delete_contact
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Schools", description = "Tenant bootstrap and access control"),
        (name = "Users", description = "Accounts, login and role management"),
        (name = "Subjects", description = "Subject catalogue"),
        (name = "Classes", description = "Classes, enrolment and teaching assignments"),
        (name = "Exercises", description = "Exercise authoring, submission and scoring"),
        (name = "Grades", description = "Exam grades and report cards"),
        (name = "Progress", description = "Submission analytics"),
        (name = "Notifications", description = "Announcements with attachments"),
        (name = "Chats", description = "AI tutoring chat"),
        (name = "Contacts", description = "Public contact form"),
        (name = "Health", description = "Liveness"),
    ),
    info(
        title = "School Management API",
        version = "1.0.0",
        description = "Multi-tenant school management backend",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
