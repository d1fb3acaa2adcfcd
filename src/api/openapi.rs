//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, profile_handler};
use crate::domain::{AccountResponse, Role, UserType};
use crate::security::Authority;

/// OpenAPI documentation for the gopang account service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gopang Account Service",
        version = "0.1.0",
        description = "Account registration, sessions, and member administration for the gopang shop",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::verify_email,
        // Profile endpoints
        profile_handler::get_profile,
        profile_handler::change_password,
        profile_handler::change_nickname,
        // Admin endpoints
        admin_handler::search_members,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserType,
            Authority,
            AccountResponse,
            // Auth types
            auth_handler::SignUpRequest,
            auth_handler::LoginRequest,
            auth_handler::SessionResponse,
            auth_handler::SignUpResponse,
            // Profile types
            profile_handler::ChangePasswordRequest,
            profile_handler::ChangeNicknameRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login, and email verification"),
        (name = "Profile", description = "Operations on the authenticated account"),
        (name = "Admin", description = "Member administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer session tokens
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
