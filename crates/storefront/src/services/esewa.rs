//! Payment gateway handoff (eSewa ePay v2).
//!
//! Checkout hands the browser to the gateway's hosted page via an
//! auto-submitting POST form. The gateway authenticates the request with a
//! keyed hash over an ordered subset of the fields; the field order and the
//! `name=value` comma joining are fixed by the gateway and must be
//! reproduced bit-exactly.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;
use uuid::Uuid;

use samaya_core::Price;

use crate::config::EsewaConfig;

type HmacSha256 = Hmac<Sha256>;

/// The fields covered by the signature, in the exact order the gateway
/// verifies them.
pub const SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// Everything the auto-submitting gateway form carries.
///
/// Field values are pre-rendered strings; the template emits them verbatim
/// as hidden inputs.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    /// Hosted form endpoint to POST to.
    pub action_url: String,
    /// Pre-tax subtotal.
    pub amount: String,
    /// Always zero - the store quotes tax-inclusive prices.
    pub tax_amount: String,
    /// Subtotal plus delivery charge.
    pub total_amount: String,
    /// Fresh per-attempt identifier, never reused.
    pub transaction_uuid: String,
    /// Merchant product code.
    pub product_code: String,
    /// Always zero.
    pub product_service_charge: String,
    /// Flat delivery surcharge.
    pub product_delivery_charge: String,
    /// Local route the gateway redirects to on success.
    pub success_url: String,
    /// Local route the gateway redirects to on failure.
    pub failure_url: String,
    /// The ordered field list covered by `signature`.
    pub signed_field_names: String,
    /// Base64 HMAC-SHA256 over the signed fields.
    pub signature: String,
}

/// Build a signed gateway request for one checkout attempt.
///
/// `transaction_uuid` is a fresh v4 UUID on every call, so retried checkouts
/// never reuse an identifier.
#[must_use]
pub fn build_request(config: &EsewaConfig, base_url: &str, subtotal: Price, delivery: Price) -> GatewayRequest {
    let transaction_uuid = Uuid::new_v4().to_string();
    let total = subtotal.plus(delivery);

    let signature = sign(
        config.secret_key.expose_secret(),
        &total.plain(),
        &transaction_uuid,
        &config.product_code,
    );

    GatewayRequest {
        action_url: config.form_url.clone(),
        amount: subtotal.plain(),
        tax_amount: "0".to_string(),
        total_amount: total.plain(),
        transaction_uuid,
        product_code: config.product_code.clone(),
        product_service_charge: "0".to_string(),
        product_delivery_charge: delivery.plain(),
        success_url: format!("{base_url}/payment/success"),
        failure_url: format!("{base_url}/payment/failure"),
        signed_field_names: SIGNED_FIELD_NAMES.to_string(),
        signature,
    }
}

/// Compute the gateway signature.
///
/// The message is the signed fields joined as `name=value` pairs with
/// commas, in the order of [`SIGNED_FIELD_NAMES`]; the output is the
/// base64-encoded HMAC-SHA256 digest.
#[must_use]
pub fn sign(secret_key: &str, total_amount: &str, transaction_uuid: &str, product_code: &str) -> String {
    let message = format!(
        "total_amount={total_amount},transaction_uuid={transaction_uuid},product_code={product_code}"
    );

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC can take a key of any size");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    const SANDBOX_KEY: &str = "8gBm/:&EnhH.1/q";

    fn sandbox_config() -> EsewaConfig {
        EsewaConfig {
            form_url: "https://rc-epay.esewa.com.np/api/epay/main/v2/form".to_string(),
            product_code: "EPAYTEST".to_string(),
            secret_key: SecretString::from(SANDBOX_KEY),
        }
    }

    #[test]
    fn test_signature_reference_vector() {
        let signature = sign(SANDBOX_KEY, "100", "11-201-13", "EPAYTEST");
        assert_eq!(signature, "5DZywcrTKD0gia/rsSMcrRHmJl+4Tbol6S+lWgdJ94E=");
    }

    #[test]
    fn test_signature_second_vector() {
        let signature = sign(
            SANDBOX_KEY,
            "2200",
            "ab14a8f2-1234-4a6e-97f3-5d9304b3a1d9",
            "EPAYTEST",
        );
        assert_eq!(signature, "aUdrEzchrEO026CwSllyJs/FoWXutE5maB2eKloIgUA=");
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign(SANDBOX_KEY, "2200", "fixed-uuid", "EPAYTEST");
        let b = sign(SANDBOX_KEY, "2200", "fixed-uuid", "EPAYTEST");
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_request_amounts() {
        let request = build_request(
            &sandbox_config(),
            "http://localhost:8080",
            Price::from_rupees(2000),
            Price::from_rupees(200),
        );

        assert_eq!(request.amount, "2000");
        assert_eq!(request.tax_amount, "0");
        assert_eq!(request.total_amount, "2200");
        assert_eq!(request.product_delivery_charge, "200");
        assert_eq!(request.product_code, "EPAYTEST");
        assert_eq!(request.signed_field_names, SIGNED_FIELD_NAMES);
        assert_eq!(request.success_url, "http://localhost:8080/payment/success");
        assert_eq!(request.failure_url, "http://localhost:8080/payment/failure");

        // The signature must cover exactly the signed fields
        let expected = sign(
            SANDBOX_KEY,
            &request.total_amount,
            &request.transaction_uuid,
            &request.product_code,
        );
        assert_eq!(request.signature, expected);
    }

    #[test]
    fn test_transaction_uuid_is_fresh_per_attempt() {
        let config = sandbox_config();
        let first = build_request(
            &config,
            "http://localhost:8080",
            Price::from_rupees(1000),
            Price::from_rupees(200),
        );
        let second = build_request(
            &config,
            "http://localhost:8080",
            Price::from_rupees(1000),
            Price::from_rupees(200),
        );
        assert_ne!(first.transaction_uuid, second.transaction_uuid);
        assert_ne!(first.signature, second.signature);
    }
}
