//! Static pages

use axum::Json;

use crate::dto::feed::AboutResponse;

pub async fn author() -> Json<AboutResponse> {
    Json(AboutResponse {
        title: "About the author",
        text: "A short page about the person behind this blog.",
    })
}

pub async fn tech() -> Json<AboutResponse> {
    Json(AboutResponse {
        title: "Technologies",
        text: "Rust, axum, tokio, sqlx and PostgreSQL.",
    })
}
