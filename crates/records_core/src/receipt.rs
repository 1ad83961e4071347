use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Issues an official receipt number for a payment on `request_id`.
///
/// Format: `OR-<yyyymmdd>-<first 8 hex chars of sha256(request id || timestamp)>`.
/// Deterministic for the same request and instant, so a retried submission stamps the same number.
pub fn issue_receipt_number(request_id: Uuid, issued_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request_id.as_bytes());
    hasher.update(issued_at.timestamp_millis().to_be_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("OR-{}-{}", issued_at.format("%Y%m%d"), &digest[..8])
}
