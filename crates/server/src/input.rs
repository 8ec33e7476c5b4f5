//! Scoring input extraction.
//!
//! `/predict` accepts the same data in three encodings. The content type is
//! inspected once and the body is decoded into a [`NumericTable`]:
//!
//! | content type | body |
//! |--------------|------|
//! | `multipart/form-data` | CSV file in the `file` field |
//! | `text/csv` | CSV text |
//! | `application/json` | bare array of numbers, scored as one column `v` |

use anomaly::{parse_csv, NumericTable};
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};

use crate::error::ApiError;

/// Column name given to bare JSON series.
pub const SERIES_COLUMN: &str = "v";

/// A request body decoded into a numeric table.
#[derive(Debug)]
pub struct ScoreInput(pub NumericTable);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Multipart,
    Csv,
    Json,
}

fn classify(content_type: Option<&str>) -> Result<InputKind, ApiError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "multipart/form-data" => Ok(InputKind::Multipart),
        "text/csv" => Ok(InputKind::Csv),
        "application/json" => Ok(InputKind::Json),
        "" => Err(ApiError::BadRequest("missing content type".to_string())),
        other => Err(ApiError::BadRequest(format!(
            "unsupported content type {}; send multipart/form-data, text/csv or application/json",
            other
        ))),
    }
}

#[async_trait]
impl<S> FromRequest<S> for ScoreInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let table = match classify(content_type.as_deref())? {
            InputKind::Multipart => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                let text = file_field(&mut multipart).await?;
                parse_csv(&text)?
            }
            InputKind::Csv => {
                let text = String::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                parse_csv(&text)?
            }
            InputKind::Json => {
                let Json(values) = Json::<Vec<f64>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                NumericTable::from_series(SERIES_COLUMN, &values)?
            }
        };
        Ok(ScoreInput(table))
    }
}

async fn file_field(multipart: &mut Multipart) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            return field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()));
        }
    }
    Err(ApiError::BadRequest("multipart body has no file field".to_string()))
}
