use {
    crate::domain::error::SyncError,
    hmac::{Hmac, Mac},
    sha2::Sha256,
};

type HmacSha256 = Hmac<Sha256>;

/// Parsed `x-signature` header: comma-separated `k=v` pairs, e.g.
/// `ts=1704908010,v1=618c8534...`. An `alg` pair may be present; anything
/// other than (normalized) sha256 is rejected. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub ts: Option<String>,
    pub v1: String,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SyncError> {
        let mut ts = None;
        let mut v1 = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match (key.trim(), value.trim()) {
                ("ts", value) => ts = Some(value.to_string()),
                ("v1", value) => v1 = Some(value.to_ascii_lowercase()),
                ("alg", value) => {
                    // Header carries names like "HMAC-SHA256"; normalize
                    // before comparing.
                    let normalized = value
                        .strip_prefix("HMAC-")
                        .unwrap_or(value)
                        .to_ascii_lowercase();
                    if normalized != "sha256" {
                        return Err(SyncError::Signature(format!(
                            "unsupported signature algorithm: {value}"
                        )));
                    }
                }
                _ => {}
            }
        }

        let v1 = v1.ok_or_else(|| {
            SyncError::Signature("x-signature header has no v1 component".into())
        })?;
        Ok(Self { ts, v1 })
    }
}

/// Verify the header's HMAC against the exact raw bytes received. The MAC
/// covers the body only; `ts` is informational in this scheme.
pub fn verify(header: &str, secret: &str, raw_body: &[u8]) -> Result<(), SyncError> {
    let parsed = SignatureHeader::parse(header)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SyncError::Signature("invalid webhook secret".into()))?;
    mac.update(raw_body);
    let expected = hex::encode(mac.finalize().into_bytes());

    if constant_time_compare(&parsed.v1, &expected) {
        Ok(())
    } else {
        Err(SyncError::Signature("signature mismatch".into()))
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn parses_ts_and_v1() {
        let h = SignatureHeader::parse("ts=1704908010,v1=ABCDEF").unwrap();
        assert_eq!(h.ts.as_deref(), Some("1704908010"));
        assert_eq!(h.v1, "abcdef");
    }

    #[test]
    fn parses_with_spaces_and_unknown_keys() {
        let h = SignatureHeader::parse("ts=1, x=2, v1=00ff").unwrap();
        assert_eq!(h.v1, "00ff");
    }

    #[test]
    fn missing_v1_is_an_error() {
        assert!(SignatureHeader::parse("ts=1704908010").is_err());
        assert!(SignatureHeader::parse("").is_err());
    }

    #[test]
    fn normalizes_algorithm_name() {
        assert!(SignatureHeader::parse("alg=HMAC-SHA256,v1=00").is_ok());
        assert!(SignatureHeader::parse("alg=HMAC-SHA512,v1=00").is_err());
    }

    #[test]
    fn accepts_matching_hmac() {
        let body = br#"{"type":"payment","data":{"id":"999"}}"#;
        let header = format!("ts=1704908010,v1={}", sign("shhh", body));
        assert!(verify(&header, "shhh", body).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let body = br#"{"type":"payment","data":{"id":"999"}}"#;
        let header = format!("ts=1704908010,v1={}", sign("shhh", body));
        assert!(verify(&header, "shhh", b"{}").is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = b"payload";
        let header = format!("v1={}", sign("right", body));
        assert!(verify(&header, "wrong", body).is_err());
    }

    #[test]
    fn constant_time_compare_basics() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
