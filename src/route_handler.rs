use crate::command_extractor::CommandExtractor;
use crate::domain::catalog::{self, AddOn};
use crate::domain::checkout::CheckoutError;
use crate::domain::commands::CheckoutCommand;
use crate::state::ApplicationState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cqrs_es::AggregateError;
use uuid::Uuid;

/// Builds the HTTP surface. A single logical endpoint per checkout; the
/// method distinguishes commands from queries.
pub fn router(state: ApplicationState) -> Router {
    Router::new()
        .route(
            "/checkout/{checkout_id}",
            get(query_handler).post(command_handler),
        )
        .route("/catalog/add-ons", get(add_ons_handler))
        .with_state(state)
}

// Serves as our query endpoint to respond with the materialized
// `CheckoutView` for the requested checkout.
pub async fn query_handler(
    Path(checkout_id): Path<String>,
    State(state): State<ApplicationState>,
) -> Response {
    let Ok(uuid) = Uuid::parse_str(&checkout_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid checkout ID format").into_response();
    };

    match state.checkout_query.load(&uuid.to_string()).await {
        Some(checkout_view) => (StatusCode::OK, Json(checkout_view)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// Serves as our command endpoint to make changes in a `Checkout` aggregate.
pub async fn command_handler(
    Path(checkout_id): Path<String>,
    State(state): State<ApplicationState>,
    CommandExtractor(metadata, command): CommandExtractor,
) -> Response {
    let Ok(uuid) = Uuid::parse_str(&checkout_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid checkout ID format").into_response();
    };

    match &command {
        CheckoutCommand::Start { id, .. } if *id != uuid => {
            return (StatusCode::BAD_REQUEST, "Checkout ID does not match path").into_response();
        }
        // Only the payment saga may charge the card.
        CheckoutCommand::ProcessPayment => {
            return (StatusCode::BAD_REQUEST, "Command not accepted").into_response();
        }
        _ => {}
    }

    match state
        .cqrs
        .execute_with_metadata(&uuid.to_string(), command, metadata)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(AggregateError::UserError(CheckoutError::NotFound)) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(AggregateError::UserError(err)) => {
            tracing::debug!(%checkout_id, error = %err, "command rejected");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(AggregateError::AggregateConflict) => {
            tracing::warn!(%checkout_id, "concurrent command on checkout");
            (StatusCode::CONFLICT, "Checkout was modified concurrently").into_response()
        }
        Err(err) => {
            tracing::error!(%checkout_id, error = %err, "command failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

pub async fn add_ons_handler() -> Json<Vec<AddOn>> {
    Json(catalog::add_ons())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::cqrs_framework;
    use crate::domain::checkout::CheckoutServices;
    use crate::services::membership_provider::StaticMembershipProvider;
    use crate::services::payment_gateway::SimulatedPaymentGateway;

    fn app() -> Router {
        let services = CheckoutServices::new(
            Arc::new(StaticMembershipProvider::immediate()),
            Arc::new(SimulatedPaymentGateway::immediate()),
        );
        let (cqrs, checkout_query) = cqrs_framework(services, None);
        router(ApplicationState {
            cqrs,
            checkout_query,
        })
    }

    fn post(id: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/checkout/{id}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_view(id: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/checkout/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    fn start(id: Uuid) -> Value {
        json!({
            "Start": {
                "id": id,
                "product": {
                    "id": "swiss-alps",
                    "title": "Swiss Alps Adventure",
                    "price": 1000.0,
                    "location": "zermatt-switzerland"
                }
            }
        })
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn start_then_query() {
        let app = app();
        let id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(post(&id.to_string(), &start(id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(post(
                &id.to_string(),
                &json!({"UpdateField": {"field": "firstName", "value": "Ada"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_view(&id.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["stepNumber"], 1);
        assert_eq!(view["draft"]["firstName"], "Ada");
        let total = view["pricing"]["totalPrice"].as_f64().unwrap();
        assert!((total - 1120.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn rejected_command_is_a_bad_request() {
        let app = app();
        let id = Uuid::new_v4();
        app.clone()
            .oneshot(post(&id.to_string(), &start(id)))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post(&id.to_string(), &json!("Retreat")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn advance_with_errors_is_accepted_and_reported_in_the_view() {
        let app = app();
        let id = Uuid::new_v4();
        app.clone()
            .oneshot(post(&id.to_string(), &start(id)))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post(&id.to_string(), &json!("Advance")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let view = json_body(app.oneshot(get_view(&id.to_string())).await.unwrap()).await;
        assert_eq!(view["stepNumber"], 1);
        assert_eq!(view["errors"]["firstName"], "First name is required");
    }

    #[tokio::test]
    async fn unknown_checkout_is_not_found() {
        let app = app();
        let id = Uuid::new_v4().to_string();

        let response = app.clone().oneshot(get_view(&id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(post(&id, &json!("Advance"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_requests_are_rejected() {
        let app = app();

        let response = app.clone().oneshot(get_view("not-a-uuid")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let id = Uuid::new_v4();
        let response = app
            .clone()
            .oneshot(post(&id.to_string(), &json!({"Teleport": {}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(post(&Uuid::new_v4().to_string(), &start(id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post(&id.to_string(), &json!("ProcessPayment")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lists_the_add_on_catalog() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/catalog/add-ons")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let add_ons = json_body(response).await;
        assert_eq!(add_ons.as_array().unwrap().len(), 4);
        assert_eq!(add_ons[0]["id"], "airport-lounge");
    }
}
