//! API router with Swagger UI

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{
    AdminService, BookingService, IdentityService, PaymentService, ReviewService, SpaceService,
};
use crate::domain::provider::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    admin, auth, bookings, health, metrics, payments, reviews, spaces,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_current_user,
        auth::update_profile,
        auth::change_password,
        // Parking spaces
        spaces::search_spaces,
        spaces::get_space,
        spaces::create_space,
        spaces::update_space,
        spaces::delete_space,
        spaces::my_spaces,
        // Bookings
        bookings::create_booking,
        bookings::list_my_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        bookings::confirm_booking,
        bookings::list_bookings_for_my_spaces,
        // Payments
        payments::create_payment,
        payments::list_my_payments,
        payments::get_payment,
        payments::complete_payment,
        payments::refund_payment,
        // Reviews
        reviews::create_review,
        reviews::list_reviews_for_space,
        reviews::list_my_reviews,
        reviews::update_review,
        reviews::delete_review,
        reviews::toggle_helpful_vote,
        reviews::respond_to_review,
        // Admin
        admin::platform_stats,
        admin::list_users,
        admin::set_user_role,
        admin::deactivate_user,
        admin::list_spaces,
        admin::set_space_status,
        admin::list_bookings,
        admin::list_payments,
        admin::set_review_visibility,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginationParams,
            PaginatedResponse<spaces::SpaceDto>,
            PaginatedResponse<bookings::BookingDto>,
            PaginatedResponse<payments::PaymentDto>,
            PaginatedResponse<reviews::ReviewDto>,
            PaginatedResponse<auth::UserDto>,
            // Health
            health::HealthResponse,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UpdateProfileRequest,
            auth::ChangePasswordRequest,
            auth::UserDto,
            // Parking spaces
            spaces::CreateSpaceRequest,
            spaces::UpdateSpaceRequest,
            spaces::SpaceDto,
            spaces::PriceDto,
            spaces::TimeSlotDto,
            // Bookings
            bookings::CreateBookingRequest,
            bookings::CancelBookingRequest,
            bookings::BookingDto,
            bookings::VehicleInfoDto,
            // Payments
            payments::CreatePaymentRequest,
            payments::CompletePaymentRequest,
            payments::RefundPaymentRequest,
            payments::PaymentDto,
            payments::RefundDto,
            // Reviews
            reviews::CreateReviewRequest,
            reviews::UpdateReviewRequest,
            reviews::RespondToReviewRequest,
            reviews::SetReviewVisibilityRequest,
            reviews::ReviewDto,
            reviews::OwnerResponseDto,
            reviews::HelpfulVoteResponse,
            // Admin
            admin::PlatformStatsDto,
            admin::SetUserRoleRequest,
            admin::SetSpaceStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Registration, login (JWT), profile and password management"),
        (name = "Parking Spaces", description = "Listing management and public search"),
        (name = "Bookings", description = "Time-window reservations with conflict detection"),
        (name = "Payments", description = "Payments with booking cascades on completion and refund"),
        (name = "Reviews", description = "Reviews of completed bookings with rating aggregation"),
        (name = "Admin", description = "Platform statistics and moderation"),
    ),
    info(
        title = "ParkShare API",
        version = "0.1.0",
        description = "REST API for the peer-to-peer parking space marketplace",
        license(name = "MIT"),
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // ── Services ───────────────────────────────────────────────
    let identity = Arc::new(IdentityService::new(repos.clone(), jwt_config));
    let space_service = Arc::new(SpaceService::new(repos.clone()));
    let booking_service = Arc::new(BookingService::new(repos.clone()));
    let payment_service = Arc::new(PaymentService::new(repos.clone()));
    let review_service = Arc::new(ReviewService::new(repos.clone()));
    let admin_service = Arc::new(AdminService::new(repos));

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState { identity };
    let auth_public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    let auth_protected = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
        .layer(from_fn_with_state(auth_state.clone(), auth_middleware));
    let auth_routes = auth_public
        .merge(auth_protected)
        .with_state(auth_handler_state);

    // ── Parking spaces ─────────────────────────────────────────
    let space_state = spaces::SpaceHandlerState {
        spaces: space_service,
    };
    let spaces_public = Router::new()
        .route("/", get(spaces::search_spaces))
        .route("/{id}", get(spaces::get_space));
    let spaces_protected = Router::new()
        .route("/", post(spaces::create_space))
        .route(
            "/{id}",
            put(spaces::update_space).delete(spaces::delete_space),
        )
        .route("/my/list", get(spaces::my_spaces))
        .layer(from_fn_with_state(auth_state.clone(), auth_middleware));
    let space_routes = spaces_public.merge(spaces_protected).with_state(space_state);

    // ── Bookings ───────────────────────────────────────────────
    let booking_state = bookings::BookingHandlerState {
        bookings: booking_service,
    };
    let booking_routes = Router::new()
        .route(
            "/",
            post(bookings::create_booking).get(bookings::list_my_bookings),
        )
        .route("/my-spaces", get(bookings::list_bookings_for_my_spaces))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/cancel", put(bookings::cancel_booking))
        .route("/{id}/confirm", put(bookings::confirm_booking))
        .layer(from_fn_with_state(auth_state.clone(), auth_middleware))
        .with_state(booking_state);

    // ── Payments ───────────────────────────────────────────────
    let payment_state = payments::PaymentHandlerState {
        payments: payment_service,
    };
    let payment_routes = Router::new()
        .route(
            "/",
            post(payments::create_payment).get(payments::list_my_payments),
        )
        .route("/{id}", get(payments::get_payment))
        .route("/{id}/complete", put(payments::complete_payment))
        .route("/{id}/refund", put(payments::refund_payment))
        .layer(from_fn_with_state(auth_state.clone(), auth_middleware))
        .with_state(payment_state);

    // ── Reviews ────────────────────────────────────────────────
    let review_state = reviews::ReviewHandlerState {
        reviews: review_service.clone(),
    };
    let reviews_public =
        Router::new().route("/space/{space_id}", get(reviews::list_reviews_for_space));
    let reviews_protected = Router::new()
        .route("/", post(reviews::create_review))
        .route("/my", get(reviews::list_my_reviews))
        .route(
            "/{id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route("/{id}/helpful", put(reviews::toggle_helpful_vote))
        .route("/{id}/response", put(reviews::respond_to_review))
        .layer(from_fn_with_state(auth_state.clone(), auth_middleware));
    let review_routes = reviews_public
        .merge(reviews_protected)
        .with_state(review_state);

    // ── Admin ──────────────────────────────────────────────────
    let admin_state = admin::AdminHandlerState {
        admin: admin_service,
        reviews: review_service,
    };
    let admin_routes = Router::new()
        .route("/stats", get(admin::platform_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::deactivate_user))
        .route("/users/{id}/role", put(admin::set_user_role))
        .route("/spaces", get(admin::list_spaces))
        .route("/spaces/{id}/status", put(admin::set_space_status))
        .route("/bookings", get(admin::list_bookings))
        .route("/payments", get(admin::list_payments))
        .route("/reviews/{id}/visibility", put(admin::set_review_visibility))
        .layer(from_fn_with_state(auth_state, auth_middleware))
        .with_state(admin_state);

    // ── Unprotected infrastructure endpoints ───────────────────
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/spaces", space_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/payments", payment_routes)
        .nest("/api/v1/reviews", review_routes)
        .nest("/api/v1/admin", admin_routes)
        .layer(from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
