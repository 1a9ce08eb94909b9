//! API documentation routes.
//!
//! Introspection surface, excluded from audit logging by the capture
//! layer's skip list. The document is hand-maintained; it describes the
//! public surface, it is not generated from it.

use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

pub async fn docs_index() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <html><head><title>accounts-api</title></head>\
         <body><h1>accounts-api</h1>\
         <p>Machine-readable description: <a href=\"/docs/openapi.json\">/docs/openapi.json</a></p>\
         </body></html>",
    )
}

pub async fn openapi_document() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.3",
        "info": { "title": "accounts-api", "version": "0.1.0" },
        "paths": {
            "/auth/login": {
                "post": { "summary": "Exchange credentials for a bearer token" }
            },
            "/users": {
                "get": { "summary": "List users (admin)" },
                "post": { "summary": "Create a user (admin)" }
            },
            "/users/{id}": {
                "get": { "summary": "Fetch a user by id (admin)" },
                "put": { "summary": "Update a user (admin)" },
                "delete": { "summary": "Deactivate a user (admin)" }
            },
            "/health": {
                "get": { "summary": "Liveness probe" }
            }
        }
    }))
}
