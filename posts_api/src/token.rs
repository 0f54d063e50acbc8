use redact::Secret;
use serde::Deserialize;
use sha2::{Digest, Sha256};

const HASH_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 digest of a delete token, as kept in the
/// `delete_token_hash` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHash(String);

impl TokenHash {
    pub fn of(token: &DeleteToken) -> Self {
        let digest = Sha256::digest(token.0.expose_secret().as_bytes());
        Self(hex::encode(digest))
    }

    /// Accepts a stored digest only if it is 64 lowercase hex characters.
    pub fn parse(value: &str) -> Option<Self> {
        let well_formed = value.len() == HASH_HEX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a stored digest. A malformed stored value never
    /// matches.
    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

/// Client-held secret that authorizes deleting a post. Redacted in logs.
#[derive(Debug, Clone)]
pub struct DeleteToken(Secret<String>);

impl DeleteToken {
    /// Trims the value and rejects it when nothing is left.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Secret::new(trimmed.to_string())))
        }
    }

    /// Pulls the token out of a delete request body.
    ///
    /// The body is never rejected for being malformed: anything that does
    /// not decode to an object is read as an object without `deleteToken`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let request = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .filter(serde_json::Value::is_object)
            .and_then(|value| serde_json::from_value::<DeleteRequest>(value).ok())
            .unwrap_or_else(|| {
                tracing::debug!("delete request body is not a JSON object");
                DeleteRequest::default()
            });

        Self::new(&coerce_to_text(request.delete_token))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeleteRequest {
    #[serde(rename = "deleteToken", default)]
    delete_token: Option<serde_json::Value>,
}

fn coerce_to_text(value: Option<serde_json::Value>) -> String {
    value.map_or_else(String::new, |value| value_to_text(&value))
}

/// Renders a JSON value the way a browser-side `String(value)` would, so
/// tokens posted as numbers or arrays hash the same as on the client.
fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => {
            n.as_f64().map_or_else(|| n.to_string(), number_to_text)
        }
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // nulls inside a list render as empty slots
                serde_json::Value::Null => String::new(),
                other => value_to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        serde_json::Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip decimal form: plain notation for exponents in
/// `-7..21`, otherwise `d.ddde+N`.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn number_to_text(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_to_text(-value));
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e3`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, fraction) = digits.split_at(n as usize);
        format!("{whole}.{fraction}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    }
}
