use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/users/role",
        get(handlers::user::get_user_role).put(handlers::user::set_user_role),
    )
}
