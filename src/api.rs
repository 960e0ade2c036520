//! JSON rating endpoint: `POST /api/rate/{id}` with body `{"rating": n}`.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::app_system::ShopError;
use crate::domain::ProductId;
use crate::product_actor::ProductError;
use crate::storefront::{parse_rating, Storefront};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub rating: Value,
}

/// Status code and JSON body for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn error(err: &ShopError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

/// Integers are taken as-is; a string is parsed the way the product page
/// form parses it. Anything else is rejected.
fn score(rating: &Value) -> Result<i64, ProductError> {
    match rating {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ProductError::Validation(format!("rating must be a whole number, got {n}"))),
        Value::String(raw) => parse_rating(raw),
        other => Err(ProductError::Validation(format!("rating must be a whole number, got {other}"))),
    }
}

/// Handles a rating submission.
///
/// `200 {"ok": true, "avg": ..}` on success, `400 {"error": ..}` for a
/// malformed body or out-of-range rating, `404 {"error": ..}` for an
/// unknown product.
#[instrument(skip(storefront, body))]
pub async fn rate_product_json(storefront: &Storefront, product_id: ProductId, body: &[u8]) -> ApiResponse {
    let request: RateRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Malformed rating body");
            return ApiResponse::error(&ShopError::Validation(format!("malformed body: {e}")));
        }
    };

    let result = match score(&request.rating) {
        Ok(score) => storefront.rate_score(product_id, score).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(avg) => ApiResponse {
            status: 200,
            body: json!({ "ok": true, "avg": avg }),
        },
        Err(e) => ApiResponse::error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_scores_are_accepted() {
        assert_eq!(score(&json!(4)), Ok(4));
        assert_eq!(score(&json!("5")), Ok(5));
    }

    #[test]
    fn fractional_and_non_numeric_scores_are_rejected() {
        for rating in [json!(4.5), json!("x"), json!(null), json!([3])] {
            assert!(matches!(score(&rating), Err(ProductError::Validation(_))), "{rating}");
        }
    }
}
