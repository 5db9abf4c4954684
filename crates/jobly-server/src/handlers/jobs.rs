use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use jobly::{Job, JobDetail, JobListing};
use serde::Serialize;

use crate::{
    auth::AdminUser,
    error::{ApiError, ApiResult},
    input::{JobPatchInput, JobSearchQuery, NewJobInput},
    state::AppState,
};

#[derive(Serialize)]
pub struct JobsBody {
    pub jobs: Vec<JobListing>,
}

#[derive(Serialize)]
pub struct JobBody<T> {
    pub job: T,
}

#[derive(Serialize)]
pub struct DeletedBody {
    pub deleted: i32,
}

/// `GET /jobs`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobSearchQuery>, QueryRejection>,
) -> ApiResult<Json<JobsBody>> {
    let Query(query) = query?;
    let filter = query.try_into_filter()?;

    let conn = state.pool.get().await?;
    let jobs = Job::find_all(&conn, &filter).await?;
    Ok(Json(JobsBody { jobs }))
}

/// `GET /jobs/:id`
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<JobBody<JobDetail>>> {
    let Path(id) = id?;

    let conn = state.pool.get().await?;
    let job = Job::get(&conn, id).await?;
    Ok(Json(JobBody { job }))
}

/// `POST /jobs`
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    body: Result<Json<NewJobInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobBody<Job>>)> {
    let Json(input) = body?;
    let new_job = input.try_into_new_job()?;

    let conn = state.pool.get().await?;
    let job = Job::create(&conn, new_job).await?;
    tracing::debug!(job_id = job.id, admin = %admin.sub, "job created via api");
    Ok((StatusCode::CREATED, Json(JobBody { job })))
}

/// `PATCH /jobs/:id`
pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<JobPatchInput>, JsonRejection>,
) -> ApiResult<Json<JobBody<Job>>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let patch = input.try_into_patch()?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No data"));
    }

    let conn = state.pool.get().await?;
    let job = Job::update(&conn, id, patch).await?;
    tracing::debug!(job_id = id, admin = %admin.sub, "job updated via api");
    Ok(Json(JobBody { job }))
}

/// `DELETE /jobs/:id`
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<DeletedBody>> {
    let Path(id) = id?;

    let conn = state.pool.get().await?;
    Job::remove(&conn, id).await?;
    tracing::debug!(job_id = id, admin = %admin.sub, "job removed via api");
    Ok(Json(DeletedBody { deleted: id }))
}
