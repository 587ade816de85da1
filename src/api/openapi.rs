//! OpenAPI document for the REST API.
//!
//! Served at `/api-docs/openapi.json` (with Swagger UI at `/swagger-ui`)
//! when the `swagger-ui` feature is enabled.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    CommentRequest, CommentResponse, CreateOrderRequest, CreateUserRequest, LoginRequest,
    LoginResponse, MeResponse, MessageResponse, OrderListResponse, OrderResponse,
    UpdateOrderRequest, UpdateUserRequest, UserListResponse, UserProfile, UserResponse,
};
use crate::api::handlers::system::HealthResponse;
use crate::domain::{Comment, OrderStatus, Priority, Role, ServiceOrder};
use crate::error::{ErrorBody, ErrorResponse};

/// Registers the bearer credential scheme referenced by the handlers.
struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token returned by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "Service order tracker API",
        description = "Users, service orders and comments for a repair workshop. Changes are also pushed over the `/ws` realtime channel."
    ),
    paths(
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::me,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::update_user,
        crate::api::handlers::users::delete_user,
        crate::api::handlers::orders::list_orders,
        crate::api::handlers::orders::order_history,
        crate::api::handlers::orders::create_order,
        crate::api::handlers::orders::get_order,
        crate::api::handlers::orders::update_order,
        crate::api::handlers::orders::delete_order,
        crate::api::handlers::orders::add_comment,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(
        LoginRequest, LoginResponse, MeResponse,
        UserProfile, UserResponse, UserListResponse, CreateUserRequest, UpdateUserRequest,
        ServiceOrder, Comment, OrderStatus, Priority, Role,
        OrderResponse, OrderListResponse, CreateOrderRequest, UpdateOrderRequest,
        CommentRequest, CommentResponse, MessageResponse,
        HealthResponse, ErrorResponse, ErrorBody,
    )),
    tags(
        (name = "Auth", description = "Login and current user"),
        (name = "Users", description = "Workshop staff accounts"),
        (name = "Orders", description = "Service orders and their comments"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_order_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/os",
            "/api/os/history",
            "/api/os/{id}",
            "/api/os/{id}/comments",
            "/api/users/{id}",
            "/api/auth/login",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let registered = doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer"));
        assert!(registered);
    }
}
