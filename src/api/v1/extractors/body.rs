/*
 * Responsibility
 * - Request body extractors whose rejections use the AppError JSON body
 * - ApiJson: JSON only
 * - JsonOrForm: JSON, urlencoded or multipart text fields, chosen by Content-Type
 */
use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

pub const INVALID_JSON: &str = "Invalid JSON in request body.";
pub const INVALID_FORM: &str = "Invalid form data in request body.";

fn invalid_json() -> AppError {
    AppError::bad_request("INVALID_JSON", INVALID_JSON)
}

fn invalid_form() -> AppError {
    AppError::bad_request("INVALID_FORM", INVALID_FORM)
}

/// `Json<T>` with a JSON error body on rejection. Parser text is logged, not returned.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "json body rejected");
                Err(invalid_json())
            }
        }
    }
}

/// Accepts the same fields as JSON, `application/x-www-form-urlencoded` or
/// `multipart/form-data`. Multipart file parts and unnamed parts are skipped.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/x-www-form-urlencoded" => match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => Ok(JsonOrForm(value)),
                Err(rejection) => {
                    tracing::debug!(error = %rejection.body_text(), "form body rejected");
                    Err(invalid_form())
                }
            },
            "multipart/form-data" => {
                let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                    tracing::debug!(error = %e.body_text(), "multipart body rejected");
                    invalid_form()
                })?;
                multipart_fields(multipart).await.map(JsonOrForm)
            }
            _ => {
                let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
                Ok(JsonOrForm(value))
            }
        }
    }
}

async fn multipart_fields<T: DeserializeOwned + Send>(mut multipart: Multipart) -> Result<T, AppError> {
    let mut fields = Map::new();

    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "multipart field rejected");
            invalid_form()
        })?;
        let Some(field) = field else {
            break;
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let text = field.text().await.map_err(|e| {
            tracing::debug!(error = %e, field = %name, "multipart text rejected");
            invalid_form()
        })?;
        fields.insert(name, Value::String(text));
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        tracing::debug!(error = %e, "multipart fields do not match request shape");
        invalid_form()
    })
}
