//! GitHub webhook signature verification.
//!
//! GitHub signs every delivery with an HMAC of the raw body keyed by the
//! webhook secret, and sends it in two headers:
//!
//! - `X-Hub-Signature-256: sha256=<hex>`
//! - `X-Hub-Signature: sha1=<hex>`
//!
//! Either is accepted; when both are present the SHA-256 one is checked.
//! Verification happens before any parsing, and a delivery with no valid
//! signature is rejected outright.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// The HMAC digest a signature header was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    fn prefix(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1=",
            SignatureAlgorithm::Sha256 => "sha256=",
        }
    }
}

/// Parses a signature header (`sha256=<hex>` or `sha1=<hex>`) into its
/// algorithm and raw bytes.
///
/// Returns `None` for malformed headers. Never panics.
///
/// # Examples
///
/// ```
/// use paul::webhooks::{parse_signature_header, SignatureAlgorithm};
///
/// let (algorithm, bytes) = parse_signature_header("sha1=abcd").unwrap();
/// assert_eq!(algorithm, SignatureAlgorithm::Sha1);
/// assert_eq!(bytes, vec![0xab, 0xcd]);
///
/// assert!(parse_signature_header("md5=abcd").is_none());
/// assert!(parse_signature_header("sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<(SignatureAlgorithm, Vec<u8>)> {
    [SignatureAlgorithm::Sha256, SignatureAlgorithm::Sha1]
        .into_iter()
        .find_map(|algorithm| {
            let hex_sig = header.strip_prefix(algorithm.prefix())?;
            Some((algorithm, hex::decode(hex_sig).ok()?))
        })
}

/// Computes the HMAC of `payload` keyed by `secret`.
pub fn compute_signature(algorithm: SignatureAlgorithm, payload: &[u8], secret: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so the Err arms are unreachable.
    match algorithm {
        SignatureAlgorithm::Sha1 => match HmacSha1::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        },
        SignatureAlgorithm::Sha256 => match HmacSha256::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        },
    }
}

/// Formats a signature as a GitHub-style header value.
pub fn format_signature_header(algorithm: SignatureAlgorithm, signature: &[u8]) -> String {
    format!("{}{}", algorithm.prefix(), hex::encode(signature))
}

/// Verifies a single signature header against the payload and secret.
///
/// Uses constant-time comparison.
///
/// # Examples
///
/// ```
/// use paul::webhooks::{
///     compute_signature, format_signature_header, verify_signature, SignatureAlgorithm,
/// };
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
///
/// let sig = compute_signature(SignatureAlgorithm::Sha1, payload, secret);
/// let header = format_signature_header(SignatureAlgorithm::Sha1, &sig);
///
/// assert!(verify_signature(payload, &header, secret));
/// assert!(!verify_signature(payload, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some((algorithm, expected)) = parse_signature_header(signature_header) else {
        return false;
    };

    match algorithm {
        SignatureAlgorithm::Sha1 => match HmacSha1::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.verify_slice(&expected).is_ok()
            }
            Err(_) => false,
        },
        SignatureAlgorithm::Sha256 => match HmacSha256::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.verify_slice(&expected).is_ok()
            }
            Err(_) => false,
        },
    }
}

/// Verifies a delivery given the values of both signature headers.
///
/// The SHA-256 header wins when present; the SHA-1 header is only consulted
/// when it is absent. No header at all fails.
pub fn verify_delivery(
    payload: &[u8],
    sha256_header: Option<&str>,
    sha1_header: Option<&str>,
    secret: &[u8],
) -> bool {
    match (sha256_header, sha1_header) {
        (Some(header), _) => verify_signature(payload, header, secret),
        (None, Some(header)) => verify_signature(payload, header, secret),
        (None, None) => false,
    }
}
