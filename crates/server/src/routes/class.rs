use crate::auth::CurrentUser;
use crate::dtos::class::{
    AddStudentRequest, AssignTeacherRequest, ClassDetailResponse, ClassListQuery, ClassResponse,
    ClassStatisticsResponse, ClassStudentsResponse, ClassTeacherResponse, ClassTeachersResponse,
    ClassesPagination, CreateClassRequest, CreatedClassResponse, PaginatedClassesResponse,
    StudentsPagination, UpdateClassRequest,
};
use crate::dtos::{MessageResponse, SubjectSummary, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use database::services::class::{ClassListFilter, ClassService};
use database::services::user::UserService;
use models::role::Role;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

fn current_academic_year() -> String {
    Utc::now().year().to_string()
}

/// Create a class (admin or higher)
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = CreatedClassResponse),
        (status = 400, description = "No school found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<CreatedClassResponse>), ApiError> {
    current.require_role(Role::Admin)?;
    let school_id = current.school_id()?;

    let class = ClassService::create(
        &state.db,
        body.name,
        body.grade_label,
        school_id,
        body.academic_year.unwrap_or_else(current_academic_year),
        current.user.id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedClassResponse {
            message: "Class created successfully".to_string(),
            class: ClassResponse::from(&class),
        }),
    ))
}

/// List classes visible to the requester
#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassListQuery),
    responses((status = 200, description = "Classes", body = PaginatedClassesResponse)),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn list_classes(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ClassListQuery>,
) -> Result<Json<PaginatedClassesResponse>, ApiError> {
    let mut filter = ClassListFilter {
        school_id: current.user.school_id,
        grade_label: query.grade_label,
        academic_year: query.academic_year,
        ..Default::default()
    };

    match current.role {
        Role::Teacher => filter.teacher_id = Some(current.user.id),
        Role::Student => match current.user.student_class_id {
            Some(class_id) => filter.class_id = Some(class_id),
            None => {
                return Ok(Json(PaginatedClassesResponse {
                    classes: vec![],
                    pagination: ClassesPagination {
                        current_page: query.page,
                        total_pages: 0,
                        total_classes: 0,
                    },
                }));
            }
        },
        _ => {}
    }

    let (classes, total) = ClassService::list(&state.db, filter, query.page, query.limit).await?;
    Ok(Json(PaginatedClassesResponse {
        classes: classes.iter().map(ClassResponse::from).collect(),
        pagination: ClassesPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_classes: total,
        },
    }))
}

/// Class detail with teachers and statistics
#[utoipa::path(
    get,
    path = "/api/classes/{classId}",
    params(("classId" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = ClassDetailResponse),
        (status = 404, description = "Class not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<ClassDetailResponse>, ApiError> {
    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let teachers = ClassService::teachers(&state.db, class_id).await?;
    let statistics = ClassService::statistics(&state.db, class_id).await?;

    Ok(Json(ClassDetailResponse {
        class: ClassResponse::from(&class),
        teachers: teachers
            .iter()
            .map(|(teacher, subjects)| ClassTeacherResponse {
                teacher: UserSummary::from(teacher),
                subjects: subjects.iter().map(SubjectSummary::from).collect(),
            })
            .collect(),
        statistics: ClassStatisticsResponse {
            total_exercises: statistics.total_exercises,
            total_students: statistics.total_students,
            total_teachers: statistics.total_teachers,
        },
    }))
}

/// Update class fields (admin or higher)
#[utoipa::path(
    put,
    path = "/api/classes/{classId}",
    params(("classId" = Uuid, Path, description = "Class ID")),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 404, description = "Class not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Json(body): Json<UpdateClassRequest>,
) -> Result<Json<ClassResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let class = ClassService::update(
        &state.db,
        class_id,
        body.name,
        body.grade_label,
        body.academic_year,
        body.is_active,
    )
    .await?;
    Ok(Json(ClassResponse::from(&class)))
}

/// Delete a class; exercises, progress and grades cascade
#[utoipa::path(
    delete,
    path = "/api/classes/{classId}",
    params(("classId" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Class not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    ClassService::delete(&state.db, class_id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}

/// Enroll a student into the class
#[utoipa::path(
    post,
    path = "/api/classes/{classId}/students",
    params(("classId" = Uuid, Path, description = "Class ID")),
    request_body = AddStudentRequest,
    responses(
        (status = 200, description = "Student added", body = MessageResponse),
        (status = 400, description = "Student from another school"),
        (status = 404, description = "Class or student not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn add_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Json(body): Json<AddStudentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let student = UserService::find_by_id(&state.db, body.student_id)
        .await?
        .filter(|u| u.role == "student")
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    if student.school_id != Some(class.school_id) {
        return Err(ApiError::validation(
            "Student must belong to the same school as the class",
        ));
    }

    ClassService::add_student(&state.db, class_id, student).await?;
    Ok(Json(MessageResponse::new(
        "Student added to class successfully",
    )))
}

/// Remove a student from the class
#[utoipa::path(
    delete,
    path = "/api/classes/{classId}/students/{studentId}",
    params(
        ("classId" = Uuid, Path, description = "Class ID"),
        ("studentId" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student removed", body = MessageResponse),
        (status = 404, description = "Class or student not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn remove_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((class_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    ClassService::remove_student(&state.db, class_id, student_id).await?;
    Ok(Json(MessageResponse::new(
        "Student removed from class successfully",
    )))
}

/// Assign a teacher to subjects in the class; subjects accumulate
#[utoipa::path(
    post,
    path = "/api/classes/{classId}/teachers",
    params(("classId" = Uuid, Path, description = "Class ID")),
    request_body = AssignTeacherRequest,
    responses(
        (status = 200, description = "Teacher assigned", body = MessageResponse),
        (status = 400, description = "Teacher from another school"),
        (status = 404, description = "Class or teacher not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn assign_teacher(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Json(body): Json<AssignTeacherRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let teacher = UserService::find_by_id(&state.db, body.teacher_id)
        .await?
        .filter(|u| u.role == "teacher")
        .ok_or_else(|| ApiError::not_found("Teacher not found"))?;

    if teacher.school_id != Some(class.school_id) {
        return Err(ApiError::validation(
            "Teacher must belong to the same school as the class",
        ));
    }

    ClassService::assign_teacher(&state.db, class_id, teacher.id, body.subject_ids).await?;
    Ok(Json(MessageResponse::new(
        "Teacher assigned to subjects successfully",
    )))
}

/// Remove a teacher (and all their subjects) from the class
#[utoipa::path(
    delete,
    path = "/api/classes/{classId}/teachers/{teacherId}",
    params(
        ("classId" = Uuid, Path, description = "Class ID"),
        ("teacherId" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher removed", body = MessageResponse),
        (status = 404, description = "Class not found")
    ),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn remove_teacher(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((class_id, teacher_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    ClassService::remove_teacher(&state.db, class_id, teacher_id).await?;
    Ok(Json(MessageResponse::new(
        "Teacher removed from class successfully",
    )))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_students_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_students_limit() -> u64 {
    50
}

/// Students enrolled in the class
#[utoipa::path(
    get,
    path = "/api/classes/{classId}/students",
    params(("classId" = Uuid, Path, description = "Class ID"), StudentsQuery),
    responses((status = 200, description = "Students", body = ClassStudentsResponse)),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn list_students(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Query(query): Query<StudentsQuery>,
) -> Result<Json<ClassStudentsResponse>, ApiError> {
    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let (students, total) =
        ClassService::students(&state.db, class_id, query.page, query.limit).await?;
    Ok(Json(ClassStudentsResponse {
        students: students.iter().map(UserSummary::from).collect(),
        pagination: StudentsPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_students: total,
        },
    }))
}

/// Teachers of the class with their subjects
#[utoipa::path(
    get,
    path = "/api/classes/{classId}/teachers",
    params(("classId" = Uuid, Path, description = "Class ID")),
    responses((status = 200, description = "Teachers", body = ClassTeachersResponse)),
    security(("bearer" = [])),
    tag = "Classes"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<ClassTeachersResponse>, ApiError> {
    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let teachers = ClassService::teachers(&state.db, class_id).await?;
    Ok(Json(ClassTeachersResponse {
        teachers: teachers
            .iter()
            .map(|(teacher, subjects)| ClassTeacherResponse {
                teacher: UserSummary::from(teacher),
                subjects: subjects.iter().map(SubjectSummary::from).collect(),
            })
            .collect(),
    }))
}
