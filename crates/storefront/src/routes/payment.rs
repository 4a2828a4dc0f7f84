//! Payment return pages.
//!
//! The gateway redirects the browser back here with a base64-encoded JSON
//! `data` query parameter. That payload is untrusted display data only - its
//! signature is NOT verified, and nothing order-affecting may ever depend on
//! it. Authoritative confirmation has to come from the backend reconciling
//! with the gateway out of band.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;

use super::Nav;

/// Query parameters on the gateway's return redirect.
#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    /// Base64-encoded JSON payload from the gateway.
    pub data: Option<String>,
}

/// The subset of the gateway payload worth showing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
struct GatewayPayload {
    #[serde(default)]
    transaction_code: Option<String>,
    #[serde(default)]
    total_amount: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
}

/// Payment success page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/success.html")]
pub struct PaymentSuccessTemplate {
    pub nav: Nav,
    pub transaction_code: Option<String>,
    pub total_amount: Option<String>,
    pub status: Option<String>,
}

/// Payment failure page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/failure.html")]
pub struct PaymentFailureTemplate {
    pub nav: Nav,
}

/// Decode the gateway payload, degrading to nothing on any malformation.
fn decode_payload(data: Option<&str>) -> GatewayPayload {
    let Some(data) = data else {
        return GatewayPayload::default();
    };

    BASE64
        .decode(data)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_else(|| {
            tracing::warn!("Gateway return payload could not be decoded");
            GatewayPayload::default()
        })
}

/// Display the payment-success confirmation.
#[instrument(skip(nav, query))]
pub async fn success(nav: Nav, Query(query): Query<ReturnQuery>) -> PaymentSuccessTemplate {
    let payload = decode_payload(query.data.as_deref());

    PaymentSuccessTemplate {
        nav,
        transaction_code: payload.transaction_code,
        total_amount: payload.total_amount.map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }),
        status: payload.status,
    }
}

/// Display the payment-failure page.
#[instrument(skip(nav))]
pub async fn failure(nav: Nav) -> PaymentFailureTemplate {
    PaymentFailureTemplate { nav }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload_happy_path() {
        let json = r#"{"transaction_code":"0007G6I","total_amount":"2,200.0","status":"COMPLETE"}"#;
        let encoded = BASE64.encode(json);
        let payload = decode_payload(Some(&encoded));
        assert_eq!(payload.transaction_code.as_deref(), Some("0007G6I"));
        assert_eq!(payload.status.as_deref(), Some("COMPLETE"));
    }

    #[test]
    fn test_decode_payload_degrades_on_garbage() {
        let payload = decode_payload(Some("not-base64!!!"));
        assert!(payload.transaction_code.is_none());

        let payload = decode_payload(Some(&BASE64.encode("not json")));
        assert!(payload.status.is_none());

        let payload = decode_payload(None);
        assert!(payload.total_amount.is_none());
    }
}
