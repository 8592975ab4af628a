use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post, put};
use log::info;
use migration::{Migrator, MigratorTrait};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod ai;
mod auth;
mod doc;
mod dtos;
mod error;
mod lookup;
mod routes;
mod state;
mod uploads;
mod utils;

use crate::state::AppState;
use routes::{
    chat, class, contact, exercise, grade, health, notification, progress, root, school, subject,
    user,
};

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/api/health", get(health::health))
        .route(
            "/api/schools",
            post(school::create_school).get(school::get_school),
        )
        .route("/api/schools/access", put(school::toggle_access))
        .route("/api/schools/name", put(school::rename_school))
        .route("/api/users/login", post(user::login))
        .route("/api/users/profile", get(user::get_profile))
        .route("/api/users", post(user::create_user).get(user::list_users))
        .route(
            "/api/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/api/users/{id}/password", put(user::change_password))
        .route(
            "/api/subjects",
            post(subject::create_subject).get(subject::list_subjects),
        )
        .route(
            "/api/subjects/{subjectId}",
            get(subject::get_subject)
                .put(subject::update_subject)
                .delete(subject::delete_subject),
        )
        .route(
            "/api/classes",
            post(class::create_class).get(class::list_classes),
        )
        .route(
            "/api/classes/{classId}",
            get(class::get_class)
                .put(class::update_class)
                .delete(class::delete_class),
        )
        .route(
            "/api/classes/{classId}/students",
            post(class::add_student).get(class::list_students),
        )
        .route(
            "/api/classes/{classId}/students/{studentId}",
            delete(class::remove_student),
        )
        .route(
            "/api/classes/{classId}/teachers",
            post(class::assign_teacher).get(class::list_teachers),
        )
        .route(
            "/api/classes/{classId}/teachers/{teacherId}",
            delete(class::remove_teacher),
        )
        .route(
            "/api/exercises",
            post(exercise::create_exercise).get(exercise::list_exercises),
        )
        .route(
            "/api/exercises/subject/{subjectId}",
            get(exercise::exercises_by_subject),
        )
        .route(
            "/api/exercises/{exerciseId}",
            get(exercise::get_exercise)
                .put(exercise::update_exercise)
                .delete(exercise::delete_exercise),
        )
        .route(
            "/api/exercises/{exerciseId}/submit",
            post(exercise::submit_exercise),
        )
        .route(
            "/api/exercises/{exerciseId}/progress",
            get(exercise::get_exercise_progress),
        )
        .route("/api/grades", post(grade::create_grade))
        .route(
            "/api/grades/student/{studentId}",
            get(grade::get_grades_by_student),
        )
        .route(
            "/api/grades/student/{studentId}/report",
            get(grade::get_student_report),
        )
        .route("/api/grades/class/{classId}", get(grade::get_grades_by_class))
        .route(
            "/api/grades/{gradeId}",
            put(grade::update_grade).delete(grade::delete_grade),
        )
        .route(
            "/api/progress/student/{studentId}",
            get(progress::student_overview),
        )
        .route("/api/progress/class/{classId}", get(progress::class_progress))
        .route(
            "/api/progress/exercise/{exerciseId}/analytics",
            get(progress::exercise_analytics),
        )
        .route("/api/progress/{progressId}", delete(progress::delete_progress))
        .route(
            "/api/notifications",
            post(notification::create_notification).get(notification::list_notifications),
        )
        .route(
            "/api/notifications/stats",
            get(notification::notification_stats),
        )
        .route(
            "/api/notifications/{id}",
            get(notification::get_notification)
                .put(notification::update_notification)
                .delete(notification::delete_notification),
        )
        .route(
            "/api/notifications/{id}/read",
            patch(notification::mark_as_read),
        )
        .route(
            "/api/notifications/{id}/attachments/{filename}",
            get(notification::view_attachment),
        )
        .route(
            "/api/notifications/{id}/attachments/{filename}/download",
            get(notification::download_attachment),
        )
        .route("/api/chats", post(chat::create_chat).get(chat::list_chats))
        .route(
            "/api/chats/{chatId}",
            get(chat::get_chat).delete(chat::delete_chat),
        )
        .route("/api/chats/{chatId}/message", post(chat::send_message))
        .route("/api/chats/{chatId}/title", patch(chat::update_chat_title))
        .route(
            "/api/contacts",
            post(contact::create_contact).get(contact::list_contacts),
        )
        .route(
            "/api/contacts/{id}",
            get(contact::get_contact).delete(contact::delete_contact),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", doc::ApiDoc::openapi()))
        // Five attachments of up to 10 MiB each, plus form overhead.
        .layer(DefaultBodyLimit::max(
            uploads::MAX_ATTACHMENTS * uploads::MAX_ATTACHMENT_BYTES + 1024 * 1024,
        ))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let db = database::db::create_connection()
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(db);
    state
        .uploads
        .ensure_dirs()
        .await
        .expect("Failed to create upload directories");

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{bind_addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .expect("Server error");
}
