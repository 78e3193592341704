pub mod describe;
pub mod generate;

use crate::error::RelayError;
use axum::{
    extract::{rejection::FormRejection, FromRequest},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(describe::generate_description, generate::generate_image),
    components(schemas(
        describe::DescribeForm,
        describe::DescribeResponse,
        generate::GenerateForm,
        generate::GenerateResponse
    ))
)]
pub struct ApiDoc;

pub async fn openapi_doc() -> AppJson<utoipa::openapi::OpenApi> {
    AppJson(ApiDoc::openapi())
}

// Wrap `axum::Json` so response serialization stays behind one type and
// rejections can be swapped for our own format if a JSON body endpoint
// ever appears.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

// Same wrapper for the form-encoded request bodies both endpoints take.
// `axum::Form` rejects with plain text; this turns that into our JSON shape.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);

pub enum AppError {
    FormRejection(FormRejection),
    JsonRejection(axum::extract::rejection::JsonRejection),
    Relay(RelayError),
}

// Every error leaves as JSON `{"error": message}` so the browser client can
// always read one field, with a status code matching the failure class.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let (status, error) = match self {
            AppError::FormRejection(rejection) => (rejection.status(), rejection.body_text()),
            AppError::JsonRejection(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Relay(error) => {
                let status = match &error {
                    RelayError::MissingParameter(_) => StatusCode::BAD_REQUEST,
                    RelayError::UpstreamShape(_)
                    | RelayError::UpstreamStatus { .. }
                    | RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
                    RelayError::PollTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    RelayError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };

                if status.is_server_error() {
                    tracing::error!("request failed: {}", error);
                }

                (status, error.to_string())
            }
        };

        (status, AppJson(ErrorResponse { error })).into_response()
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::FormRejection(rejection)
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::JsonRejection(rejection)
    }
}

impl From<RelayError> for AppError {
    fn from(error: RelayError) -> Self {
        Self::Relay(error)
    }
}

pub async fn health_check() -> &'static str {
    "ok"
}

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>lora-relay</title></head>
<body>
<h1>lora-relay</h1>
<p>POST <code>/generate_description</code> with <code>control_image_url</code>,
then POST <code>/generate_image</code> with the cleaned description.</p>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}


#[cfg(test)]
pub(crate) mod test_util {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };

    pub fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }
}
