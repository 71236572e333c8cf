pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{analytics, applications, jobs, saved};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job discovery (public; auth only enriches the viewer annotation)
        .route(
            "/api/jobs",
            get(jobs::handlers::handle_list_jobs).post(jobs::handlers::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handlers::handle_get_job).delete(jobs::handlers::handle_delete_job),
        )
        // Application lifecycle
        .route(
            "/api/applications/apply/:job_id",
            post(applications::handlers::handle_apply),
        )
        .route(
            "/api/applications/job/:job_id",
            get(applications::handlers::handle_list_for_job),
        )
        .route(
            "/api/applications/:id/status",
            patch(applications::handlers::handle_update_status),
        )
        .route(
            "/api/applications/my-applications",
            get(applications::handlers::handle_my_applications),
        )
        .route(
            "/api/applications/stats",
            get(analytics::handlers::handle_recruiter_stats),
        )
        // Saved jobs
        .route("/api/saved-jobs/toggle", post(saved::handlers::handle_toggle))
        .route("/api/saved-jobs", get(saved::handlers::handle_list))
        .with_state(state)
}
