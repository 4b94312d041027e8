use crate::api::UpdateOutcome;
use crate::switch::{LineStatus, SwitchError, SwitchService};
use anyhow::{Context, Result};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::{any::Any, collections::HashMap, net::SocketAddr};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;

/// Switch request body, accepted as JSON or as an urlencoded form.
///
/// Fields that are absent or not strings are left empty, so they fail the
/// password or line check instead of failing extraction. Bodies of any
/// other content type are treated as empty.
#[derive(Debug, Default)]
pub struct SwitchRequest {
    pub line_choice: Option<String>,
    pub password: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for SwitchRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if content_type == "application/x-www-form-urlencoded" {
            let Form(mut fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| malformed_body(e.status(), e.body_text()))?;
            return Ok(Self {
                line_choice: fields.remove("line_choice"),
                password: fields.remove("password"),
            });
        }

        if content_type.starts_with("application/") && content_type.ends_with("json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| malformed_body(e.status(), e.body_text()))?;
            let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
            return Ok(Self {
                line_choice: field("line_choice"),
                password: field("password"),
            });
        }

        Ok(Self::default())
    }
}

fn malformed_body(status: StatusCode, detail: String) -> Response {
    warn!("Rejected malformed switch request: {}", detail);
    let body = UpdateOutcome {
        success: false,
        message: "Malformed request body.".to_string(),
    };
    (status, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
pub struct CurrentIpResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: LineStatus,
}

impl IntoResponse for SwitchError {
    fn into_response(self) -> Response {
        let status = match self {
            SwitchError::Unauthorized => StatusCode::UNAUTHORIZED,
            SwitchError::InvalidLineChoice => StatusCode::BAD_REQUEST,
            SwitchError::TargetNotConfigured(line) => {
                error!("No IP configured for the {} line", line);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = UpdateOutcome {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: SwitchService) -> Router {
    Router::new()
        .route("/api/switch-dns", post(switch_dns))
        .route("/api/current-ip", get(current_ip))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(service)
}

pub async fn serve(port: u16, service: SwitchService) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server is running on port {}", port);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn switch_dns(
    State(service): State<SwitchService>,
    request: SwitchRequest,
) -> Result<Json<UpdateOutcome>, SwitchError> {
    let outcome = service
        .switch(request.line_choice.as_deref(), request.password.as_deref())
        .await?;
    Ok(Json(outcome))
}

async fn current_ip(State(service): State<SwitchService>) -> Json<CurrentIpResponse> {
    Json(CurrentIpResponse {
        success: true,
        status: service.status().await,
    })
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    let body = UpdateOutcome {
        success: false,
        message: "Internal server error.".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
