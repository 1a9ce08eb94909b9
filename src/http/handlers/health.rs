//! Health probe.

pub async fn health() -> &'static str {
    "Healthy"
}
