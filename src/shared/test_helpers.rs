#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::from_u128(1),
        username: "admin".to_string(),
        is_admin: true,
    }
}

#[cfg(test)]
pub fn create_regular_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::from_u128(2),
        username: "alice".to_string(),
        is_admin: false,
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_regular_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_regular_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

#[cfg(test)]
pub fn with_regular_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_regular_middleware))
}
