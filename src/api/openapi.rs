//! OpenAPI document for the REST surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{CreatePostRequest, CredentialsRequest, TokenResponse};
use super::handlers::{account, post, system};
use crate::domain::Post;
use crate::error::ErrorResponse;

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`
/// when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "murmur-gateway",
        description = "Short posts with real-time delivery. Connect to `GET /ws` with \
                       `Authorization: Bearer <token>` to receive every new post as a \
                       JSON text frame."
    ),
    paths(
        account::register,
        account::login,
        post::create_post,
        post::list_posts,
        system::health_handler,
    ),
    components(schemas(
        CredentialsRequest,
        TokenResponse,
        CreatePostRequest,
        Post,
        ErrorResponse,
        system::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Accounts", description = "Registration and login"),
        (name = "Posts", description = "Creating and reading posts"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}
