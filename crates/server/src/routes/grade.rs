use crate::auth::CurrentUser;
use crate::dtos::grade::{
    Bulletin, ClassGradesResponse, CreateGradeRequest, CreatedGradeResponse, GradeListQuery,
    GradeResponse, GradeStatistics, ReportStudent, StudentGradesResponse, StudentReportResponse,
    SubjectAverageResponse, SubjectReport, UpdateGradeRequest,
};
use crate::dtos::{ClassSummary, MessageResponse, SubjectSummary, UserSummary};
use crate::error::ApiError;
use crate::lookup;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use database::entities::grade;
use database::services::class::ClassService;
use database::services::grade::{GradeFilter, GradeService, NewGrade};
use database::services::user::UserService;
use models::access::{require_owner, require_teaches_class, require_teaches_subject};
use models::grading::{
    Appreciation, GradeRecord, aggregate, validate_coefficient, validate_grade,
};
use models::role::Role;
use std::collections::BTreeMap;
use uuid::Uuid;

async fn to_responses(
    state: &AppState,
    grades: &[grade::Model],
) -> Result<Vec<GradeResponse>, ApiError> {
    let mut user_ids: Vec<Uuid> = grades.iter().map(|g| g.student_id).collect();
    user_ids.extend(grades.iter().map(|g| g.teacher_id));
    let users = lookup::users_by_id(&state.db, user_ids).await?;
    let subjects =
        lookup::subjects_by_id(&state.db, grades.iter().map(|g| g.subject_id).collect()).await?;
    let classes =
        lookup::classes_by_id(&state.db, grades.iter().map(|g| g.class_id).collect()).await?;

    grades
        .iter()
        .map(|g| {
            let student = users
                .get(&g.student_id)
                .ok_or_else(|| ApiError::internal("grade student missing".to_string()))?;
            let teacher = users
                .get(&g.teacher_id)
                .ok_or_else(|| ApiError::internal("grade teacher missing".to_string()))?;
            let subject = subjects
                .get(&g.subject_id)
                .ok_or_else(|| ApiError::internal("grade subject missing".to_string()))?;
            let class = classes
                .get(&g.class_id)
                .ok_or_else(|| ApiError::internal("grade class missing".to_string()))?;
            Ok(GradeResponse {
                id: g.id,
                student: UserSummary::from(student),
                subject: SubjectSummary::from(subject),
                class: ClassSummary::from(class),
                teacher: UserSummary::from(teacher),
                exam_name: g.exam_name.clone(),
                exam_type: g.exam_type.clone(),
                grade: g.grade,
                coefficient: g.coefficient,
                exam_date: g.exam_date,
                trimester: g.trimester.clone(),
                academic_year: g.academic_year.clone(),
                comments: g.comments.clone(),
                appreciation: g.appreciation.clone(),
                created_at: g.created_at,
            })
        })
        .collect()
}

const EXAM_TYPES: [&str; 7] = ["controle", "devoir", "examen", "test", "oral", "tp", "autre"];
const TRIMESTERS: [&str; 3] = ["1er Trimestre", "2ème Trimestre", "3ème Trimestre"];

/// Access rule for reading a student's grades.
async fn check_can_view_student(
    state: &AppState,
    current: &CurrentUser,
    student_id: Uuid,
) -> Result<(), ApiError> {
    let student_class = match current.role {
        Role::Teacher => {
            UserService::find_by_id(&state.db, student_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Élève non trouvé"))?
                .student_class_id
        }
        _ => None,
    };
    let links = match current.role {
        Role::Teacher => UserService::teaching_links(&state.db, current.user.id).await?,
        _ => Vec::new(),
    };
    models::access::can_view_student_data(&current.actor(), student_id, student_class, &links)?;
    Ok(())
}

/// Record an exam grade (teaching teacher only)
#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeRequest,
    responses(
        (status = 201, description = "Grade recorded", body = CreatedGradeResponse),
        (status = 400, description = "Invalid grade value or duplicate exam entry"),
        (status = 403, description = "Teacher does not teach this subject in this class"),
        (status = 404, description = "Class not found")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn create_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateGradeRequest>,
) -> Result<(StatusCode, Json<CreatedGradeResponse>), ApiError> {
    current.require_role(Role::Teacher)?;
    let school_id = current.school_id()?;

    validate_grade(body.grade)?;
    let coefficient = body.coefficient.unwrap_or(1.0);
    validate_coefficient(coefficient)?;
    if !EXAM_TYPES.contains(&body.exam_type.as_str()) {
        return Err(ApiError::validation("Type d'examen invalide"));
    }
    if !TRIMESTERS.contains(&body.trimester.as_str()) {
        return Err(ApiError::validation("Trimestre invalide"));
    }

    let class = ClassService::find_by_id(&state.db, body.class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Classe non trouvée"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    let links = UserService::teaching_links(&state.db, current.user.id).await?;
    require_teaches_subject(&links, body.class_id, body.subject_id)?;

    let student = UserService::find_by_id(&state.db, body.student_id).await?;
    let enrolled = student
        .as_ref()
        .map(|s| s.role == "student" && s.student_class_id == Some(body.class_id))
        .unwrap_or(false);
    if !enrolled {
        return Err(ApiError::validation(
            "Élève non trouvé ou n'appartient pas à cette classe",
        ));
    }

    let grade = GradeService::create(
        &state.db,
        NewGrade {
            student_id: body.student_id,
            class_id: body.class_id,
            subject_id: body.subject_id,
            teacher_id: current.user.id,
            exam_name: body.exam_name,
            exam_type: body.exam_type,
            grade: body.grade,
            coefficient,
            exam_date: body
                .exam_date
                .map(|d| d.naive_utc())
                .unwrap_or_else(|| Utc::now().naive_utc()),
            trimester: body.trimester,
            academic_year: body
                .academic_year
                .unwrap_or_else(|| Utc::now().year().to_string()),
            comments: body.comments,
            appreciation: Appreciation::from_average(body.grade).as_str().to_string(),
            school_id,
        },
    )
    .await?;

    let response = to_responses(&state, std::slice::from_ref(&grade)).await?.remove(0);
    Ok((
        StatusCode::CREATED,
        Json(CreatedGradeResponse {
            message: "Note créée avec succès".to_string(),
            grade: response,
        }),
    ))
}

/// A student's grades with weighted averages per subject
#[utoipa::path(
    get,
    path = "/api/grades/student/{studentId}",
    params(("studentId" = Uuid, Path, description = "Student ID"), GradeListQuery),
    responses(
        (status = 200, description = "Grades and statistics", body = StudentGradesResponse),
        (status = 403, description = "Not your grades to read")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn get_grades_by_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(student_id): Path<Uuid>,
    Query(query): Query<GradeListQuery>,
) -> Result<Json<StudentGradesResponse>, ApiError> {
    check_can_view_student(&state, &current, student_id).await?;

    let grades = GradeService::list_by_student(
        &state.db,
        student_id,
        GradeFilter {
            academic_year: query.academic_year,
            trimester: query.trimester,
            subject_id: query.subject,
            exam_type: None,
        },
    )
    .await?;

    let records: Vec<GradeRecord> = grades
        .iter()
        .map(|g| GradeRecord {
            subject_id: g.subject_id,
            grade: g.grade,
            coefficient: g.coefficient,
        })
        .collect();
    let summary = aggregate(&records)?;

    let subjects =
        lookup::subjects_by_id(&state.db, grades.iter().map(|g| g.subject_id).collect()).await?;
    let mut moyenne_par_matiere = BTreeMap::new();
    for (subject_id, average) in &summary.per_subject {
        let name = subjects
            .get(subject_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| subject_id.to_string());
        moyenne_par_matiere.insert(
            name,
            SubjectAverageResponse {
                moyenne: average.average,
                nombre_notes: average.grade_count,
            },
        );
    }

    Ok(Json(StudentGradesResponse {
        statistics: GradeStatistics {
            total_grades: grades.len(),
            moyenne_generale: summary.overall_average,
            moyenne_par_matiere,
        },
        grades: to_responses(&state, &grades).await?,
    }))
}

/// The report card: per-subject averages, appreciations and the overall
#[utoipa::path(
    get,
    path = "/api/grades/student/{studentId}/report",
    params(("studentId" = Uuid, Path, description = "Student ID"), GradeListQuery),
    responses(
        (status = 200, description = "Report card", body = StudentReportResponse),
        (status = 403, description = "Not your report to read"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn get_student_report(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(student_id): Path<Uuid>,
    Query(query): Query<GradeListQuery>,
) -> Result<Json<StudentReportResponse>, ApiError> {
    check_can_view_student(&state, &current, student_id).await?;

    let student = UserService::find_by_id(&state.db, student_id)
        .await?
        .filter(|u| u.role == "student")
        .ok_or_else(|| ApiError::not_found("Élève non trouvé"))?;
    let class = match student.student_class_id {
        Some(class_id) => ClassService::find_by_id(&state.db, class_id).await?,
        None => None,
    };

    let academic_year = query.academic_year.clone();
    let trimester = query.trimester.clone();
    let grades = GradeService::list_by_student(
        &state.db,
        student_id,
        GradeFilter {
            academic_year: query.academic_year,
            trimester: query.trimester,
            subject_id: None,
            exam_type: None,
        },
    )
    .await?;

    let records: Vec<GradeRecord> = grades
        .iter()
        .map(|g| GradeRecord {
            subject_id: g.subject_id,
            grade: g.grade,
            coefficient: g.coefficient,
        })
        .collect();
    let summary = aggregate(&records)?;

    let responses = to_responses(&state, &grades).await?;
    let subjects =
        lookup::subjects_by_id(&state.db, grades.iter().map(|g| g.subject_id).collect()).await?;

    let mut matieres = Vec::new();
    for (subject_id, average) in &summary.per_subject {
        let subject = subjects
            .get(subject_id)
            .ok_or_else(|| ApiError::internal("grade subject missing".to_string()))?;
        let subject_grades: Vec<GradeResponse> = responses
            .iter()
            .zip(&grades)
            .filter(|(_, g)| g.subject_id == *subject_id)
            .map(|(r, _)| r.clone())
            .collect();
        matieres.push(SubjectReport {
            subject: SubjectSummary::from(subject),
            grades: subject_grades,
            moyenne: average.average,
            appreciation: average.appreciation.as_str().to_string(),
        });
    }

    Ok(Json(StudentReportResponse {
        student: ReportStudent {
            id: student.id,
            name: student.name.clone(),
            email: student.email.clone(),
            class: class.as_ref().map(ClassSummary::from),
        },
        bulletin: Bulletin {
            academic_year: academic_year.unwrap_or_else(|| Utc::now().year().to_string()),
            trimester: trimester.unwrap_or_else(|| "Tous les trimestres".to_string()),
            matieres,
            moyenne_generale: summary.overall_average,
            appreciation_generale: summary.overall_appreciation.as_str().to_string(),
            total_notes: grades.len(),
        },
    }))
}

/// All grades of one class (teaching staff only)
#[utoipa::path(
    get,
    path = "/api/grades/class/{classId}",
    params(("classId" = Uuid, Path, description = "Class ID"), GradeListQuery),
    responses(
        (status = 200, description = "Grades", body = ClassGradesResponse),
        (status = 403, description = "Not a teacher of this class")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn get_grades_by_class(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Query(query): Query<GradeListQuery>,
) -> Result<Json<ClassGradesResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Classe non trouvée"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    if current.role == Role::Teacher {
        let links = UserService::teaching_links(&state.db, current.user.id).await?;
        require_teaches_class(&links, class_id)?;
    }

    let grades = GradeService::list_by_class(
        &state.db,
        class_id,
        GradeFilter {
            academic_year: query.academic_year,
            trimester: query.trimester,
            subject_id: query.subject,
            exam_type: query.exam_type,
        },
    )
    .await?;

    Ok(Json(ClassGradesResponse {
        total: grades.len(),
        grades: to_responses(&state, &grades).await?,
    }))
}

/// Correct a grade (creating teacher only)
#[utoipa::path(
    put,
    path = "/api/grades/{gradeId}",
    params(("gradeId" = Uuid, Path, description = "Grade ID")),
    request_body = UpdateGradeRequest,
    responses(
        (status = 200, description = "Grade updated", body = CreatedGradeResponse),
        (status = 400, description = "Invalid grade value"),
        (status = 403, description = "You can only update your own grades"),
        (status = 404, description = "Grade not found")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn update_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(grade_id): Path<Uuid>,
    Json(body): Json<UpdateGradeRequest>,
) -> Result<Json<CreatedGradeResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let grade = GradeService::find_by_id(&state.db, grade_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Note non trouvée"))?;
    require_owner(current.user.id, grade.teacher_id)?;

    let new_value = match body.grade {
        Some(value) => {
            validate_grade(value)?;
            Some((value, Appreciation::from_average(value).as_str().to_string()))
        }
        None => None,
    };

    let updated = GradeService::update(&state.db, grade, new_value, body.comments).await?;
    let response = to_responses(&state, std::slice::from_ref(&updated))
        .await?
        .remove(0);
    Ok(Json(CreatedGradeResponse {
        message: "Note mise à jour avec succès".to_string(),
        grade: response,
    }))
}

/// Remove a grade (creating teacher only)
#[utoipa::path(
    delete,
    path = "/api/grades/{gradeId}",
    params(("gradeId" = Uuid, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 403, description = "You can only delete your own grades"),
        (status = 404, description = "Grade not found")
    ),
    security(("bearer" = [])),
    tag = "Grades"
)]
pub async fn delete_grade(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(grade_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let grade = GradeService::find_by_id(&state.db, grade_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Note non trouvée"))?;
    require_owner(current.user.id, grade.teacher_id)?;

    GradeService::delete(&state.db, grade_id).await?;
    Ok(Json(MessageResponse::new("Note supprimée avec succès")))
}
