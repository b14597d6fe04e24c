use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use yardage_core::checkout::payment::{CheckoutError, CheckoutState, PaymentConfig, PaymentSession};
use yardage_core::domain::hero::{HeroImageDraft, HeroImageId};
use yardage_core::domain::order::OrderSummary;
use yardage_core::domain::product::{ProductDraft, ProductId};
use yardage_core::domain::selection::SelectionStore;
use yardage_core::errors::{ApplicationError, InterfaceError};
use yardage_core::{message_handoff, ACCESS_DENIED_MESSAGE};
use yardage_db::repositories::RepositoryError;

use crate::bootstrap::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(catalog_view))
        .route("/api/catalog/reload", post(catalog_reload))
        .route("/api/checkout/message", post(checkout_message))
        .route("/api/checkout/payment", post(checkout_payment))
        .route("/api/checkout/payment/config", get(payment_config))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/logout", post(admin_logout))
        .route("/api/admin/products", post(create_product))
        .route("/api/admin/products/{id}", put(update_product).delete(delete_product))
        .route("/api/admin/hero-images", post(create_hero_image))
        .route(
            "/api/admin/hero-images/{id}",
            put(update_hero_image).delete(delete_hero_image),
        )
        .route("/api/admin/images", post(upload_image).delete(delete_image))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CheckoutItem {
    product_id: String,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct MessageCheckoutRequest {
    items: Vec<CheckoutItem>,
    #[serde(default)]
    delivery_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentCheckoutRequest {
    items: Vec<CheckoutItem>,
    email: String,
}

#[derive(Debug, Deserialize)]
struct AdminLoginRequest {
    secret: String,
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    name: String,
    price: Decimal,
    image: String,
}

#[derive(Debug, Deserialize)]
struct HeroImageBody {
    src: String,
    alt: String,
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct DeleteImageQuery {
    url: String,
}

impl From<ProductBody> for ProductDraft {
    fn from(body: ProductBody) -> Self {
        Self { name: body.name, price: body.price, image: body.image }
    }
}

impl From<HeroImageBody> for HeroImageDraft {
    fn from(body: HeroImageBody) -> Self {
        Self { src: body.src, alt: body.alt }
    }
}

/// Rebuilds a session selection store from the client's posted items.
/// Quantities are clamped to one yard here, on the caller side of the
/// store contract.
fn selection_from_items(items: &[CheckoutItem]) -> SelectionStore {
    let mut store = SelectionStore::new();
    for item in items {
        let id = ProductId(item.product_id.clone());
        store.set_selected(&id, true);
        store.set_quantity(&id, item.quantity.max(1));
    }
    store
}

fn error_response(error: ApplicationError) -> (StatusCode, Json<Value>) {
    let correlation_id = Uuid::new_v4().to_string();
    let interface = error.into_interface(correlation_id.clone());
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(json!({
            "error": interface.to_string(),
            "message": interface.user_message(),
            "correlation_id": correlation_id,
        })),
    )
}

fn repository_response(error: RepositoryError) -> (StatusCode, Json<Value>) {
    match error {
        RepositoryError::MissingProduct(_) | RepositoryError::MissingHeroImage(_) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": error.to_string() })))
        }
        other => error_response(ApplicationError::Persistence(other.to_string())),
    }
}

async fn require_unlocked(state: &AppState) -> Result<(), (StatusCode, Json<Value>)> {
    if state.gate.read().await.is_unlocked() {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": ACCESS_DENIED_MESSAGE }))))
    }
}

/// The storefront view: both cached collections, or the blocking load
/// error with no partial catalog.
async fn catalog_view(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let catalog = state.catalog.read().await;
    if let Some(error) = catalog.last_error() {
        return Err(error_response(ApplicationError::Persistence(error.to_string())));
    }

    Ok(Json(json!({
        "products": catalog.products(),
        "hero_images": catalog.hero_images(),
    })))
}

/// Manual recovery path: re-run the combined load on demand.
async fn catalog_reload(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut catalog = state.catalog.write().await;
    catalog
        .load()
        .await
        .map_err(|error| error_response(ApplicationError::Persistence(error.to_string())))?;

    Ok(Json(json!({
        "products": catalog.products().len(),
        "hero_images": catalog.hero_images().len(),
    })))
}

async fn checkout_message(
    State(state): State<AppState>,
    Json(request): Json<MessageCheckoutRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let summary = {
        let catalog = state.catalog.read().await;
        if let Some(error) = catalog.last_error() {
            return Err(error_response(ApplicationError::Persistence(error.to_string())));
        }

        let store = selection_from_items(&request.items);
        OrderSummary::compute(
            catalog.products(),
            &store,
            state.config.checkout.price_per_yard,
        )
    };

    let handoff = message_handoff(
        &summary,
        request.delivery_address.as_deref(),
        &state.config.checkout.messaging,
    )
    .map_err(|error| error_response(ApplicationError::Domain(error.into())))?;

    Ok(Json(json!({
        "message": handoff.message,
        "url": handoff.url,
        "total_yards": summary.total_yards,
        "total_amount": summary.total_amount,
    })))
}

/// What the widget side needs before invoking the hosted gateway: the
/// public key and currency. The secret key never leaves the server.
async fn payment_config(State(state): State<AppState>) -> Json<Value> {
    let payment = &state.config.checkout.payment;
    Json(json!({
        "enabled": payment.enabled,
        "public_key": payment.public_key,
        "currency": state.config.checkout.currency,
    }))
}

async fn checkout_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentCheckoutRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(gateway) = state.gateway.clone() else {
        return Err(error_response(ApplicationError::Configuration(
            "payment gateway is not configured".to_string(),
        )));
    };

    let summary = {
        let catalog = state.catalog.read().await;
        if let Some(error) = catalog.last_error() {
            return Err(error_response(ApplicationError::Persistence(error.to_string())));
        }

        let store = selection_from_items(&request.items);
        OrderSummary::compute(
            catalog.products(),
            &store,
            state.config.checkout.price_per_yard,
        )
    };

    let mut session = PaymentSession::new(PaymentConfig {
        currency: state.config.checkout.currency.clone(),
        reference_prefix: state.config.checkout.payment.reference_prefix.clone(),
    });

    match session.submit(gateway.as_ref(), &summary, &request.email).await {
        Ok(CheckoutState::Done { redirect }) => {
            info!(
                event_name = "checkout.payment.completed",
                redirect = %redirect,
                "payment completed"
            );
            Ok(Json(json!({ "status": "completed", "redirect": redirect })))
        }
        Ok(CheckoutState::Idle) => Ok(Json(json!({ "status": "cancelled" }))),
        Ok(CheckoutState::AwaitingCallback) => Err(error_response(
            ApplicationError::Integration("gateway returned without resolving".to_string()),
        )),
        Err(CheckoutError::Gateway(error)) => {
            Err(error_response(ApplicationError::Integration(error.to_string())))
        }
        Err(error) => Err(error_response(ApplicationError::Domain(error.into()))),
    }
}

async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> (StatusCode, Json<Value>) {
    let mut gate = state.gate.write().await;
    match gate.submit(&request.secret) {
        Ok(()) => (StatusCode::OK, Json(json!({ "unlocked": true }))),
        Err(denied) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "unlocked": false, "error": denied.to_string() })),
        ),
    }
}

async fn admin_logout(State(state): State<AppState>) -> Json<Value> {
    state.gate.write().await.lock();
    Json(json!({ "unlocked": false }))
}

async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    let created = catalog
        .create_product(body.into(), Utc::now())
        .await
        .map_err(repository_response)?;

    Ok((StatusCode::CREATED, Json(json!({ "product": created }))))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    catalog
        .update_product(&ProductId(id), body.into(), Utc::now())
        .await
        .map_err(repository_response)?;

    Ok(Json(json!({ "updated": true })))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    catalog.delete_product(&ProductId(id)).await.map_err(repository_response)?;

    Ok(Json(json!({ "deleted": true })))
}

async fn create_hero_image(
    State(state): State<AppState>,
    Json(body): Json<HeroImageBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    let created = catalog
        .create_hero_image(body.into(), Utc::now())
        .await
        .map_err(repository_response)?;

    Ok((StatusCode::CREATED, Json(json!({ "hero_image": created }))))
}

async fn update_hero_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<HeroImageBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    catalog
        .update_hero_image(HeroImageId(id), body.into(), Utc::now())
        .await
        .map_err(repository_response)?;

    Ok(Json(json!({ "updated": true })))
}

async fn delete_hero_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let mut catalog = state.catalog.write().await;
    catalog.delete_hero_image(HeroImageId(id)).await.map_err(repository_response)?;

    Ok(Json(json!({ "deleted": true })))
}

/// Accepts raw image bytes and hands them to the bucket under a
/// generated unique name, returning the public URL for the admin form
/// to store on the record.
async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let Some(images) = state.images.clone() else {
        return Err(error_response(ApplicationError::Configuration(
            "object storage is not configured".to_string(),
        )));
    };

    let url = images
        .upload(&query.filename, body.to_vec())
        .await
        .map_err(|error| error_response(ApplicationError::Integration(error.to_string())))?;

    Ok(Json(json!({ "url": url })))
}

/// Removes a replaced image from the bucket by its public URL.
async fn delete_image(
    State(state): State<AppState>,
    Query(query): Query<DeleteImageQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_unlocked(&state).await?;

    let Some(images) = state.images.clone() else {
        return Err(error_response(ApplicationError::Configuration(
            "object storage is not configured".to_string(),
        )));
    };

    images
        .delete(&query.url)
        .await
        .map_err(|error| error_response(ApplicationError::Integration(error.to_string())))?;

    Ok(Json(json!({ "deleted": true })))
}
