use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Events signed more than this long ago are treated as replays.
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed `Stripe-Signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
/// Multiple v1 entries appear while the signing secret is being rotated.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures: Vec<Vec<u8>> = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(Error::WebhookSignature(
                    "Malformed signature header".to_string(),
                ));
            };
            match key.trim() {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        Error::WebhookSignature("Invalid signature timestamp".to_string())
                    })?);
                }
                "v1" => {
                    let sig = hex::decode(value).map_err(|_| {
                        Error::WebhookSignature("Signature is not valid hex".to_string())
                    })?;
                    v1_signatures.push(sig);
                }
                // Unknown schemes (v0, future versions) are skipped.
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| Error::WebhookSignature("Missing signature timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(Error::WebhookSignature(
                "Missing v1 signature".to_string(),
            ));
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifies the raw webhook body against the `Stripe-Signature` header.
///
/// This is the sole authentication boundary for the webhook endpoint; the
/// payload must not be parsed before this returns Ok.
pub fn verify_signature(secret: &str, payload: &[u8], header: &str) -> Result<()> {
    let header = SignatureHeader::parse(header)?;

    let now = chrono::Utc::now().timestamp();
    let age = now - header.timestamp;
    if age > MAX_EVENT_AGE_SECS {
        return Err(Error::WebhookSignature(format!(
            "Signature timestamp too old ({} seconds)",
            age
        )));
    }
    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(Error::WebhookSignature(
            "Signature timestamp is in the future".to_string(),
        ));
    }

    let expected = compute_signature(secret, header.timestamp, payload);

    let valid = header
        .v1_signatures
        .iter()
        .any(|candidate| constant_time_eq(&expected, candidate));
    if !valid {
        return Err(Error::WebhookSignature("Invalid signature".to_string()));
    }
    Ok(())
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        hex::encode(compute_signature(secret, timestamp, payload))
    }

    #[test]
    fn valid_signature_passes() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", ts, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_ok());
    }

    #[test]
    fn any_matching_v1_passes_during_secret_rotation() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp();
        let stale = "ab".repeat(32);
        let header = format!("t={},v1={},v1={}", ts, stale, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_ok());
    }

    #[test]
    fn tampered_payload_fails() {
        let payload = br#"{"id":"evt_1"}"#;
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", ts, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, br#"{"id":"evt_2"}"#, &header).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", ts, sign("whsec_other", ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_err());
    }

    #[test]
    fn stale_timestamp_fails() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() - MAX_EVENT_AGE_SECS - 10;
        let header = format!("t={},v1={}", ts, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_err());
    }

    #[test]
    fn future_timestamp_beyond_skew_fails() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() + MAX_CLOCK_SKEW_SECS + 30;
        let header = format!("t={},v1={}", ts, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_err());
    }

    #[test]
    fn future_timestamp_within_skew_passes() {
        let payload = b"{}";
        let ts = chrono::Utc::now().timestamp() + 30;
        let header = format!("t={},v1={}", ts, sign(SECRET, ts, payload));
        assert!(verify_signature(SECRET, payload, &header).is_ok());
    }

    #[test]
    fn malformed_header_fails() {
        assert!(SignatureHeader::parse("t1234").is_err());
        assert!(SignatureHeader::parse("v1=abcd").is_err());
        assert!(SignatureHeader::parse("t=123").is_err());
        assert!(SignatureHeader::parse("t=123,v1=zzzz").is_err());
    }
}
