//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthError, Stage, issue_token};
use crate::domain::PnrNumber;
use crate::exchange::{
    MarketError, NewListing, NewUser, RouteQuery, VERIFICATION_FAILED, find_matching_listings,
    marketplace,
};
use crate::store::{self, UserRepo};

use super::auth::{AuthUser, JourneyUser};
use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/login/pnr", post(login_pnr))
        .route("/dashboard", get(dashboard))
        .route("/listings", post(create_listing))
        .route("/listings/browse", get(browse_listings))
        .route("/listings/:id", get(listing_detail))
        .route("/listings/:id/book", post(book_listing))
        .route("/exchanges/:id/pay", post(confirm_payment))
        .route("/pnr/verify", post(verify_pnr))
        .route("/stations/:code", get(station_name))
        .route("/trains/:number/schedule", get(train_schedule))
        .route("/admin/exchanges", get(admin_exchanges))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Response {
    match store::health_check(&state.pool).await {
        Ok(()) => "ok".into_response(),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable").into_response()
        }
    }
}

/// Index page.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render<T: Template>(template: &T) -> Result<Response, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html).into_response())
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResult>), AppError> {
    let user = marketplace::register(&state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(UserResult::from(&user))))
}

/// Login step one: username and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = marketplace::authenticate(&state.pool, &req.username, &req.password).await?;
    let token = issue_token(&user, Stage::Credentials, &state.jwt)?;

    Ok(Json(LoginResponse {
        token,
        stage: Stage::Credentials,
        user: UserResult::from(&user),
    }))
}

/// Login step two: verify a PNR and upgrade to a journey token.
///
/// Also used to switch to a different journey later.
async fn login_pnr(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PnrRequest>,
) -> Result<Json<JourneyLoginResponse>, AppError> {
    let verified =
        marketplace::verify_journey(&state.pnr_cache, &state.pool, user.user_id, &req.pnr_number)
            .await?;

    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Account no longer exists".into(),
        })?;
    let token = issue_token(&account, Stage::Journey, &state.jwt)?;

    let mut pnr_status = verified.status;
    state.stations.enrich(&mut pnr_status).await;

    tracing::info!(username = %user.username, from = ?user.stage, "journey login");
    Ok(Json(JourneyLoginResponse {
        token,
        stage: Stage::Journey,
        profile: verified.profile,
        pnr_status,
    }))
}

async fn dashboard(
    State(state): State<AppState>,
    user: JourneyUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let dashboard = marketplace::dashboard(&state.pool, user.user_id).await?;

    if accepts_html(&headers) {
        render(&DashboardTemplate::new(&user.username, &dashboard))
    } else {
        Ok(Json(dashboard).into_response())
    }
}

async fn create_listing(
    State(state): State<AppState>,
    user: JourneyUser,
    Json(req): Json<NewListing>,
) -> Result<Response, AppError> {
    let listing =
        marketplace::create_listing(&state.pnr_cache, &state.pool, user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(listing)).into_response())
}

/// Listings on the user's route, narrowed by any explicit search.
async fn browse_listings(
    State(state): State<AppState>,
    user: JourneyUser,
    headers: HeaderMap,
    Query(params): Query<BrowseParams>,
) -> Result<Response, AppError> {
    let search = params
        .to_search()
        .map_err(|message| AppError::BadRequest { message })?;
    let profile = marketplace::journey_profile(&state.pool, user.user_id).await?;
    let query = RouteQuery::resolve(profile.as_ref(), &search);

    let listings = find_matching_listings(&state.pool, user.user_id, &query).await?;

    if accepts_html(&headers) {
        render(&BrowseTemplate::new(&query, &listings))
    } else {
        Ok(Json(BrowseResponse {
            query: QueryResult::from(&query),
            listings,
        })
        .into_response())
    }
}

async fn listing_detail(
    State(state): State<AppState>,
    _user: JourneyUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let listing = marketplace::available_listing(&state.pool, id).await?;
    Ok(Json(listing).into_response())
}

async fn book_listing(
    State(state): State<AppState>,
    user: JourneyUser,
    Path(id): Path<i64>,
    Json(req): Json<BookRequest>,
) -> Result<Response, AppError> {
    let exchange = marketplace::book_listing(
        &state.pnr_cache,
        &state.pool,
        user.user_id,
        id,
        &req.buyer_pnr,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(exchange)).into_response())
}

async fn confirm_payment(
    State(state): State<AppState>,
    user: JourneyUser,
    Path(id): Path<i64>,
    Json(req): Json<PaymentRequest>,
) -> Result<Response, AppError> {
    let exchange =
        marketplace::confirm_payment(&state.pool, user.user_id, id, &req.transaction_id).await?;
    Ok(Json(exchange).into_response())
}

/// Look up a PNR without touching the user's profile.
///
/// Always answers 200; failure is reported in the body.
async fn verify_pnr(
    State(state): State<AppState>,
    _user: JourneyUser,
    Json(req): Json<PnrRequest>,
) -> Json<PnrVerifyResponse> {
    let Ok(pnr) = PnrNumber::parse_normalized(&req.pnr_number) else {
        return Json(PnrVerifyResponse::failed(VERIFICATION_FAILED));
    };

    match state.pnr_cache.fetch_pnr_status(&pnr).await {
        Some(mut status) => {
            state.stations.enrich(&mut status).await;
            Json(PnrVerifyResponse::verified(status))
        }
        None => Json(PnrVerifyResponse::failed(VERIFICATION_FAILED)),
    }
}

async fn station_name(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<StationResponse> {
    let name = state.stations.name_for(&code).await;
    Json(StationResponse {
        code: code.trim().to_ascii_uppercase(),
        name,
    })
}

async fn train_schedule(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let number = number.trim().to_string();
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest {
            message: format!("Invalid train number: {}", number),
        });
    }

    let schedule = state.provider.train_schedule(&number).await;
    Ok(Json(ScheduleResponse {
        train_number: number,
        schedule,
    }))
}

/// Paid exchanges, for ticket checkers.
async fn admin_exchanges(
    State(state): State<AppState>,
    user: JourneyUser,
) -> Result<Response, AppError> {
    let exchanges = marketplace::paid_exchanges(&state.pool, user.user_id).await?;
    Ok(Json(exchanges).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<MarketError> for AppError {
    fn from(e: MarketError) -> Self {
        let message = e.to_string();
        match e {
            MarketError::Validation(_)
            | MarketError::VerificationFailed
            | MarketError::OwnListing
            | MarketError::RouteMismatch => AppError::BadRequest { message },
            MarketError::InvalidCredentials => AppError::Unauthorized { message },
            MarketError::Forbidden => AppError::Forbidden { message },
            MarketError::NotFound(_) => AppError::NotFound { message },
            MarketError::Conflict(_) => AppError::Conflict { message },
            MarketError::Auth(_) | MarketError::Database(_) => AppError::Internal { message },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => {
                tracing::error!(%message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
