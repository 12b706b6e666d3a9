//! School routes: subjects, exams and questions.

use crate::{
    api::{
        AppState,
        error::{ValidJson, ValidPath, ValidQuery},
    },
    core::{
        exam::{self, ExamSettings, LevelTermQuery, NewExam},
        question::{self, NewQuestion, QuestionBatch, QuestionUpdate},
        subject::{self, NewSubject, SubjectRename},
        view::{ExamDetail, ExamSummary},
    },
    entities::{ExamModel, QuestionModel, SubjectModel},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of `PUT /api/exams/update-visibility-duration`
#[derive(Debug, Deserialize)]
struct ExamSettingsBatch {
    updates: Vec<ExamSettings>,
}

/// Subject, exam and question route group
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/subjects/create-subject", post(create_subject))
        .route("/api/subjects/subjects/:school_id", get(list_subjects))
        .route("/api/subjects/subject/:id", put(rename_subject))
        .route("/api/exams/create-exam", post(create_exam))
        .route("/api/exams/delete/:id", delete(delete_exam))
        .route("/api/exams/exams-by-level-term", get(exams_by_level_term))
        .route("/api/exams/exams/:subject_id", get(exams_for_subject))
        .route("/api/exams/visible-true-exams/:school_id", get(visible_exams))
        .route(
            "/api/exams/update-visibility-duration",
            put(update_visibility_duration),
        )
        .route("/api/exams/exam/:id", get(exam_detail))
        .route("/api/exams/create-questions", post(create_questions))
        .route("/api/exams/create-question", post(create_question))
        .route("/api/exams/questions/:exam_id", get(questions_for_exam))
        .route(
            "/api/exams/question/:question_id",
            get(get_question).put(update_question).delete(delete_question),
        )
}

// === Subjects ===

async fn create_subject(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewSubject>,
) -> Result<(StatusCode, Json<Value>)> {
    let subject = subject::create_subject(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Subject created successfully!", "subject": subject })),
    ))
}

async fn list_subjects(
    State(state): State<AppState>,
    ValidPath(school_id): ValidPath<String>,
) -> Result<Json<Vec<SubjectModel>>> {
    Ok(Json(subject::list_subjects_for_school(&state.db, &school_id).await?))
}

async fn rename_subject(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<SubjectRename>,
) -> Result<Json<Value>> {
    let subject = subject::rename_subject(&state.db, id, payload).await?;
    Ok(Json(
        json!({ "message": "Subject updated successfully.", "subject": subject }),
    ))
}

// === Exams ===

async fn create_exam(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewExam>,
) -> Result<(StatusCode, Json<ExamSummary>)> {
    let created = exam::create_exam(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_exam(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> Result<Json<Value>> {
    exam::delete_exam(&state.db, id).await?;
    Ok(Json(json!({ "message": "Exam deleted successfully." })))
}

async fn exams_by_level_term(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<LevelTermQuery>,
) -> Result<Json<Vec<ExamSummary>>> {
    Ok(Json(exam::list_exams_by_level_term(&state.db, query).await?))
}

async fn exams_for_subject(
    State(state): State<AppState>,
    ValidPath(subject_id): ValidPath<i64>,
) -> Result<Json<Vec<ExamModel>>> {
    Ok(Json(exam::list_exams_for_subject(&state.db, subject_id).await?))
}

async fn visible_exams(
    State(state): State<AppState>,
    ValidPath(school_id): ValidPath<String>,
) -> Result<Json<Vec<ExamSummary>>> {
    Ok(Json(exam::list_visible_exams(&state.db, &school_id).await?))
}

async fn update_visibility_duration(
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<ExamSettingsBatch>,
) -> Result<Json<Value>> {
    let count = exam::update_exam_settings(&state.db, batch.updates).await?;
    Ok(Json(json!({
        "message": "Exam visibility and durations updated successfully.",
        "count": count,
    })))
}

async fn exam_detail(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<ExamDetail>> {
    Ok(Json(exam::get_exam_detail(&state.db, id).await?))
}

// === Questions ===

async fn create_questions(
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<QuestionBatch>,
) -> Result<(StatusCode, Json<Value>)> {
    let count = question::create_questions(&state.db, batch).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Successfully added all questions", "count": count })),
    ))
}

async fn create_question(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewQuestion>,
) -> Result<(StatusCode, Json<Value>)> {
    let created = question::create_question(&state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Question added successfully", "createdQuestion": created })),
    ))
}

async fn questions_for_exam(
    State(state): State<AppState>,
    ValidPath(exam_id): ValidPath<i64>,
) -> Result<Json<Vec<QuestionModel>>> {
    Ok(Json(question::list_questions_for_exam(&state.db, exam_id).await?))
}

async fn get_question(
    State(state): State<AppState>,
    ValidPath(question_id): ValidPath<i64>,
) -> Result<Json<QuestionModel>> {
    Ok(Json(question::get_question(&state.db, question_id).await?))
}

async fn update_question(
    State(state): State<AppState>,
    ValidPath(question_id): ValidPath<i64>,
    ValidJson(payload): ValidJson<QuestionUpdate>,
) -> Result<Json<Value>> {
    let updated = question::update_question(&state.db, question_id, payload).await?;
    Ok(Json(
        json!({ "message": "Question updated successfully", "updatedQuestion": updated }),
    ))
}

async fn delete_question(
    State(state): State<AppState>,
    ValidPath(question_id): ValidPath<i64>,
) -> Result<Json<Value>> {
    question::delete_question(&state.db, question_id).await?;
    Ok(Json(json!({ "message": "Question deleted successfully" })))
}
