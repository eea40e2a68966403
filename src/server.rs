// ABOUTME: HTTP server assembly: merges every route group and applies the shared middleware stack
// ABOUTME: Serves the router until Ctrl+C or SIGTERM, then drains in-flight requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # HTTP Server
//!
//! Every request passes through, outermost first: request id assignment,
//! CORS, the request span, request id propagation onto the response, the
//! body size limit, and the request timeout.

use crate::errors::AppError;
use crate::middleware::{make_request_span, setup_cors, RequestIdGenerator, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::{
    ActivitiesRoutes, AnalyticsRoutes, CategoriesRoutes, CombinedGroupsRoutes, ExercisesRoutes,
    HealthRoutes, PlansRoutes, RolesRoutes, SessionsRoutes, WeeksRoutes,
};
use anyhow::{Context, Result};
use axum::{body::Body, extract::DefaultBodyLimit, http::Request, response::Response, Router};
use http::HeaderName;
use planner_core::constants::limits::MAX_REQUEST_BODY_BYTES;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn, Span};

/// Build the complete application router
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let timeout = Duration::from_secs(resources.config.request_timeout_secs);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(PlansRoutes::routes(resources.clone()))
        .merge(WeeksRoutes::routes(resources.clone()))
        .merge(SessionsRoutes::routes(resources.clone()))
        .merge(ActivitiesRoutes::routes(resources.clone()))
        .merge(CombinedGroupsRoutes::routes(resources.clone()))
        .merge(CategoriesRoutes::routes(resources.clone()))
        .merge(ExercisesRoutes::routes(resources.clone()))
        .merge(RolesRoutes::routes(resources.clone()))
        .merge(AnalyticsRoutes::routes(resources.clone()))
        .fallback(handle_unknown_route)
        .layer(TimeoutLayer::new(timeout))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<Body>)
                .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "Request completed"
                    );
                }),
        )
        .layer(setup_cors(&resources.config))
        .layer(SetRequestIdLayer::new(request_id, RequestIdGenerator))
}

#[allow(clippy::unused_async)]
async fn handle_unknown_route(request: Request<Body>) -> AppError {
    AppError::not_found(format!("Route {} {}", request.method(), request.uri().path()))
}

/// Bind the configured port and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;

    let app = build_router(&resources);
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
