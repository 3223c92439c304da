/*
 * Responsibility
 * - service-wide AppError definition
 * - IntoResponse impl (HTTP status / body per the API contract)
 * - uniform conversion from compute-proxy and upload-staging errors
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::compute::ComputeError;
use crate::services::uploads::UploadError;

/// The dashboard distinguishes error classes by status code alone, so 401 and
/// 403 carry no body at all. The two JSON bodies below are part of the client
/// contract and must not be reworded.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed `Authorization: Bearer <token>` header.
    #[error("unauthorized")]
    Unauthorized,

    /// Token rejected by the identity provider, or the verified identity
    /// carries no email claim.
    #[error("forbidden")]
    Forbidden,

    /// Upload request whose multipart body contained no files.
    #[error("no files uploaded")]
    NoFilesUploaded,

    /// The compute backend answered with a non-2xx status; its status and
    /// JSON body are relayed to the caller untouched.
    #[error("compute backend returned status {status}")]
    Upstream { status: u16, body: serde_json::Value },

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            AppError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            AppError::NoFilesUploaded => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No files uploaded" })),
            )
                .into_response(),
            AppError::Upstream { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(body)).into_response()
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Something went wrong on the server." })),
            )
                .into_response(),
        }
    }
}

impl From<ComputeError> for AppError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::Upstream { status, body } => AppError::Upstream { status, body },
            ComputeError::Transport(err) => {
                tracing::error!(error = %err, "compute backend request failed");
                AppError::Internal
            }
            ComputeError::InvalidBody(err) => {
                tracing::error!(error = %err, "compute backend returned a non-JSON body");
                AppError::Internal
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        tracing::error!(error = %err, "failed to stage uploaded files");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_is_401_with_empty_body() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn forbidden_is_403_with_empty_body() {
        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn no_files_uploaded_is_400_with_contract_body() {
        let response = AppError::NoFilesUploaded.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "No files uploaded" })
        );
    }

    #[tokio::test]
    async fn upstream_error_relays_status_and_body() {
        let response = AppError::Upstream {
            status: 422,
            body: json!({ "error": "bad gene symbol" }),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "bad gene symbol" })
        );
    }

    #[tokio::test]
    async fn out_of_range_upstream_status_falls_back_to_500() {
        let response = AppError::Upstream {
            status: 1000,
            body: json!({}),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_is_500_with_generic_body() {
        let response = AppError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Something went wrong on the server." })
        );
    }
}
