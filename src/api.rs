//! HTTP surface for docsum.
//!
//! - `POST /upload` – multipart body with one file part named `file`. Accepts `text/plain` and
//!   `application/pdf`, returns `{file_name, text, word_count, summary, status}`.
//!
//! Failures are reported as `{"detail": "<message>"}` with a fixed message per error class;
//! internal detail only goes to the logs. Cross-origin access is limited to the configured
//! allow-list with credentials enabled.

use crate::config::Config;
use crate::upload::{UploadApi, UploadError, UploadResult, UploadedFile};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Name of the multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the upload endpoint.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: UploadApi + 'static,
{
    Router::new()
        .route("/upload", post(upload_file::<S>))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// CORS policy: listed origins only, credentials allowed, requested methods/headers mirrored.
///
/// Credentialed responses may not use `*`, so methods and headers echo the preflight request.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Accept a document upload, extract its text, and summarize it.
async fn upload_file<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, AppError>
where
    S: UploadApi,
{
    let mut multipart = multipart
        .map_err(|rejection| UploadError::MissingFile(rejection.body_text()))?;
    let file = read_file_part(&mut multipart).await?;
    let result = service.process_upload(file).await?;
    Ok(Json(result))
}

/// Pull the first `file` part out of the multipart stream. It must carry a filename.
async fn read_file_part(multipart: &mut Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
        else {
            return Err(UploadError::MissingFile(
                "file part did not carry a filename".into(),
            ));
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(UploadError::MissingFile(format!(
        "no multipart field named '{FILE_FIELD}'"
    )))
}

fn multipart_error(error: MultipartError) -> UploadError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge(error.body_text())
    } else {
        UploadError::MissingFile(error.body_text())
    }
}

/// Response body for every error returned by the API.
#[derive(Serialize)]
struct ErrorBody {
    detail: &'static str,
}

struct AppError(UploadError);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            UploadError::UnsupportedMediaType { .. } | UploadError::ExtractionFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            UploadError::MissingFile(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UploadError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::SummarizationFailed(_) | UploadError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Upload rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.0, "Upload failed");
        }
        let body = ErrorBody {
            detail: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{FILE_FIELD, create_router};
    use crate::config::Config;
    use crate::summarization::SummarizationClientError;
    use crate::upload::{
        UPLOAD_SUCCESS_STATUS, UploadApi, UploadError, UploadResult, UploadedFile,
    };
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docsum-test-boundary";

    type Outcome = fn(&UploadedFile) -> Result<UploadResult, UploadError>;

    struct StubUploadService {
        calls: Mutex<Vec<UploadedFile>>,
        outcome: Outcome,
    }

    impl StubUploadService {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome,
            })
        }

        async fn recorded_calls(&self) -> Vec<UploadedFile> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl UploadApi for StubUploadService {
        async fn process_upload(&self, file: UploadedFile) -> Result<UploadResult, UploadError> {
            let outcome = (self.outcome)(&file);
            self.calls.lock().await.push(file);
            outcome
        }
    }

    fn echo_success(file: &UploadedFile) -> Result<UploadResult, UploadError> {
        let text = String::from_utf8_lossy(&file.bytes).to_string();
        Ok(UploadResult {
            file_name: file.file_name.clone(),
            word_count: text.split_whitespace().count(),
            text,
            summary: "Stub summary.".into(),
            status: UPLOAD_SUCCESS_STATUS.into(),
        })
    }

    fn test_config(max_upload_bytes: usize) -> Config {
        let mut config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .expect("config loads");
        config.max_upload_bytes = max_upload_bytes;
        config
    }

    fn app(service: Arc<StubUploadService>) -> Router {
        create_router(service, &test_config(1024 * 1024))
    }

    fn multipart_body(
        field: &str,
        file_name: Option<&str>,
        content_type: Option<&str>,
        contents: &[u8],
    ) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(name) => {
                format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn upload_route_returns_result_json() {
        let service = StubUploadService::new(echo_success);
        let response = app(service.clone())
            .oneshot(upload_request(multipart_body(
                FILE_FIELD,
                Some("notes.txt"),
                Some("text/plain"),
                b"hello world foo",
            )))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["file_name"], "notes.txt");
        assert_eq!(json["text"], "hello world foo");
        assert_eq!(json["word_count"], 3);
        assert_eq!(json["summary"], "Stub summary.");
        assert_eq!(json["status"], UPLOAD_SUCCESS_STATUS);

        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].file_name, "notes.txt");
        assert_eq!(calls[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(&calls[0].bytes[..], b"hello world foo");
    }

    #[tokio::test]
    async fn other_fields_are_ignored() {
        let service = StubUploadService::new(echo_success);
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nignored\r\n");
        body.extend_from_slice(&multipart_body(
            FILE_FIELD,
            Some("doc.txt"),
            Some("text/plain"),
            b"kept",
        ));

        let response = app(service.clone())
            .oneshot(upload_request(body))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["text"], "kept");
    }

    #[tokio::test]
    async fn error_classes_map_to_status_and_detail() {
        let cases: [(Outcome, StatusCode, &str); 4] = [
            (
                |_| {
                    Err(UploadError::UnsupportedMediaType {
                        content_type: Some("image/png".into()),
                    })
                },
                StatusCode::BAD_REQUEST,
                "Unsupported file type. Only PDF and TXT are allowed.",
            ),
            (
                |file| {
                    Err(UploadError::ExtractionFailed {
                        file_name: file.file_name.clone(),
                    })
                },
                StatusCode::BAD_REQUEST,
                "Failed to extract text from the file.",
            ),
            (
                |_| {
                    Err(UploadError::SummarizationFailed(
                        SummarizationClientError::GenerationFailed("401 bad key sk-live".into()),
                    ))
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to summarize text using OpenAI.",
            ),
            (
                |_| Err(UploadError::Unexpected("panic at extraction.rs:42".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error occurred.",
            ),
        ];

        for (outcome, status, detail) in cases {
            let response = app(StubUploadService::new(outcome))
                .oneshot(upload_request(multipart_body(
                    FILE_FIELD,
                    Some("notes.txt"),
                    Some("text/plain"),
                    b"hello",
                )))
                .await
                .expect("router response");

            assert_eq!(response.status(), status);
            let json = json_body(response).await;
            assert_eq!(json, serde_json::json!({ "detail": detail }));
        }
    }

    #[tokio::test]
    async fn missing_file_part_is_unprocessable() {
        let service = StubUploadService::new(echo_success);

        let wrong_field = app(service.clone())
            .oneshot(upload_request(multipart_body(
                "document",
                Some("notes.txt"),
                Some("text/plain"),
                b"hello",
            )))
            .await
            .expect("router response");
        assert_eq!(wrong_field.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(wrong_field).await["detail"],
            "A file upload is required."
        );

        let no_filename = app(service.clone())
            .oneshot(upload_request(multipart_body(
                FILE_FIELD,
                None,
                Some("text/plain"),
                b"hello",
            )))
            .await
            .expect("router response");
        assert_eq!(no_filename.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let not_multipart = app(service.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/upload")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(not_multipart.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn missing_part_content_type_reaches_the_service_as_none() {
        let service = StubUploadService::new(|_| {
            Err(UploadError::UnsupportedMediaType { content_type: None })
        });

        let response = app(service.clone())
            .oneshot(upload_request(multipart_body(
                FILE_FIELD,
                Some("mystery.bin"),
                None,
                b"???",
            )))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].content_type, None);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let service = StubUploadService::new(echo_success);
        let router = create_router(service.clone(), &test_config(64));

        let response = router
            .oneshot(upload_request(multipart_body(
                FILE_FIELD,
                Some("big.txt"),
                Some("text/plain"),
                &vec![b'a'; 4096],
            )))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json_body(response).await["detail"],
            "Uploaded file is too large."
        );
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn cors_preflight_allows_listed_origin_with_credentials() {
        let response = app(StubUploadService::new(echo_success))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/upload")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom-header")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        let headers = response.headers();
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .expect("allow-origin"),
            "http://localhost:3000"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .expect("allow-credentials"),
            "true"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_METHODS)
                .expect("allow-methods"),
            "POST"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
                .expect("allow-headers"),
            "x-custom-header"
        );
    }

    #[tokio::test]
    async fn cors_ignores_unlisted_origin() {
        let response = app(StubUploadService::new(echo_success))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/upload")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
