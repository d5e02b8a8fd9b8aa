//! Axum extractor that validates a JSON body into a record.

use crate::config::ParseOptions;
use crate::error::ValidationError;
use crate::records::Record;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

/// Extracts and validates a [`Record`] from a JSON request body.
///
/// Parse options are taken from an `Extension<ParseOptions>` layer when one is
/// installed, otherwise the defaults apply. Rejections are returned as
/// [`ValidationError`] (422 Unprocessable Entity), including bodies that are not
/// JSON at all.
///
/// # Integration
///
/// ```rust,ignore
/// async fn import(ValidatedJson(article): ValidatedJson<ArticleData>) -> StatusCode {
///     StatusCode::ACCEPTED
/// }
///
/// let app = Router::new()
///     .route("/import_articles/", post(import))
///     .layer(Extension(ParseOptions::strict()));
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Record + Send,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let options = req
            .extensions()
            .get::<ParseOptions>()
            .copied()
            .unwrap_or_default();

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(
                    record = T::NAME,
                    "rejected request body: {}",
                    rejection.body_text()
                );
                ValidationError::malformed(T::NAME, rejection.body_text())
            })?;

        T::from_value_with(&value, options).map(ValidatedJson)
    }
}
