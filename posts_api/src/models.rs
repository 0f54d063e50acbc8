use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary key of a row in the posts table.
pub type PostId = i64;

/// The columns of a post that the deletion check reads. Nothing else is
/// selected from the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: PostId,
    pub delete_token_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidId;

/// An id taken from the request path.
///
/// Any finite number is accepted, but only whole numbers inside the key
/// range can name a stored post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestedId(f64);

impl FromStr for RequestedId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = match parse_radix_literal(s) {
            Some(value) => value?,
            None => s.parse::<f64>().map_err(|_| InvalidId)?,
        };

        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(InvalidId)
        }
    }
}

/// Unsigned `0x`, `0o` and `0b` literals. Returns `None` when `s` has no
/// radix prefix so it can be read as a decimal instead.
fn parse_radix_literal(s: &str) -> Option<Result<f64, InvalidId>> {
    let prefix = s.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(Err(InvalidId));
    }

    Some(digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
            .ok_or(InvalidId)
    }))
}

impl RequestedId {
    /// The store key this id refers to, if it can refer to one at all.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn post_id(self) -> Option<PostId> {
        let value = self.0;

        // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
        if value.fract() != 0.0
            || value < i64::MIN as f64
            || value >= i64::MAX as f64
        {
            return None;
        }

        Some(value as PostId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_ids() {
        assert_eq!("5".parse::<RequestedId>().unwrap().post_id(), Some(5));
        assert_eq!(" 42 ".parse::<RequestedId>().unwrap().post_id(), Some(42));
        assert_eq!("-3".parse::<RequestedId>().unwrap().post_id(), Some(-3));
        assert_eq!("1e3".parse::<RequestedId>().unwrap().post_id(), Some(1000));
        assert_eq!("7.0".parse::<RequestedId>().unwrap().post_id(), Some(7));
    }

    #[test]
    fn test_reject_non_numeric_ids() {
        for raw in ["abc", "", "   ", "5abc", "0x", "0xg1", "-0x10", "0b102", "1_000", "five"] {
            assert_eq!(raw.parse::<RequestedId>(), Err(InvalidId), "{raw:?}");
        }
    }

    #[test]
    fn test_parse_radix_ids() {
        assert_eq!("0x10".parse::<RequestedId>().unwrap().post_id(), Some(16));
        assert_eq!("0XfF".parse::<RequestedId>().unwrap().post_id(), Some(255));
        assert_eq!("0o17".parse::<RequestedId>().unwrap().post_id(), Some(15));
        assert_eq!("0b101".parse::<RequestedId>().unwrap().post_id(), Some(5));
        assert_eq!(" 0x10 ".parse::<RequestedId>().unwrap().post_id(), Some(16));
    }

    #[test]
    fn test_reject_non_finite_ids() {
        let huge_hex = format!("0x{}", "f".repeat(300));
        for raw in ["NaN", "nan", "inf", "-inf", "Infinity", "1e400", huge_hex.as_str()] {
            assert_eq!(raw.parse::<RequestedId>(), Err(InvalidId), "{raw:?}");
        }
    }

    #[test]
    fn test_fractional_ids_are_valid_but_match_nothing() {
        let id = "1.5".parse::<RequestedId>().unwrap();
        assert_eq!(id.post_id(), None);

        let huge = "1e30".parse::<RequestedId>().unwrap();
        assert_eq!(huge.post_id(), None);
    }

    #[test]
    fn test_post_deserializes_store_row() {
        let post: Post = serde_json::from_str(
            r#"{"id": 5, "delete_token_hash": "abc"}"#,
        )
        .unwrap();
        assert_eq!(post.id, 5);
        assert_eq!(post.delete_token_hash, "abc");
    }
}
