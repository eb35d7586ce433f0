/// Bucket key codec - maps (currency, instant, width) to ordered storage keys
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PriceError, Result};
use crate::types::{PriceQuote, SupportedCurrency};
use crate::utils::parse_duration;

pub const KEY_SEPARATOR: &str = "::";

/// Digits needed for any non-negative i64
const PADDED_DIGITS: usize = 19;

/// Fixed bucket width, a positive whole number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketWidth {
    secs: i64,
}

impl BucketWidth {
    pub fn from_secs(secs: i64) -> Result<Self> {
        if secs <= 0 {
            return Err(PriceError::InvalidWidth(format!("{}s is not positive", secs)));
        }
        Ok(BucketWidth { secs })
    }

    /// Parse a duration string such as "10s" or "1m"
    pub fn parse(input: &str) -> Result<Self> {
        let duration = parse_duration(input)
            .ok_or_else(|| PriceError::InvalidWidth(format!("cannot parse {:?}", input)))?;
        Self::from_duration(duration)
            .map_err(|_| PriceError::InvalidWidth(format!("{:?} is not a positive whole number of seconds", input)))
    }

    pub fn from_duration(duration: Duration) -> Result<Self> {
        if duration.subsec_nanos() != 0 {
            return Err(PriceError::InvalidWidth(format!("{:?} has sub-second precision", duration)));
        }
        let secs = i64::try_from(duration.as_secs())
            .map_err(|_| PriceError::InvalidWidth(format!("{:?} is too large", duration)))?;
        Self::from_secs(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.secs
    }

    /// Start of the bucket containing `secs`, floored towards negative infinity
    pub fn align_down(&self, secs: i64) -> i64 {
        secs.div_euclid(self.secs) * self.secs
    }

    pub fn bucket_start(&self, at: DateTime<Utc>) -> i64 {
        self.align_down(at.timestamp())
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        BucketWidth { secs: 10 }
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

impl FromStr for BucketWidth {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self> {
        BucketWidth::parse(s)
    }
}

impl TryFrom<String> for BucketWidth {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self> {
        BucketWidth::parse(&value)
    }
}

impl From<BucketWidth> for String {
    fn from(width: BucketWidth) -> Self {
        width.to_string()
    }
}

/// How the bucket-start component of a key is rendered.
///
/// `Compact` is plain decimal and only sorts correctly while all compared
/// bucket starts have the same digit count. `Padded` zero-fills to a fixed
/// width and sorts correctly for every non-negative instant. The two are
/// different on-disk formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLayout {
    #[default]
    Compact,
    Padded,
}

/// Storage key for the bucket containing `at`
pub fn encode_key(
    currency: SupportedCurrency,
    at: DateTime<Utc>,
    width: BucketWidth,
    layout: KeyLayout,
) -> String {
    bucket_key(currency, width.bucket_start(at), layout)
}

/// Storage key for an already aligned bucket start
pub fn bucket_key(currency: SupportedCurrency, bucket_start: i64, layout: KeyLayout) -> String {
    match layout {
        KeyLayout::Compact => format!("{}{}{}", currency.as_str(), KEY_SEPARATOR, bucket_start),
        KeyLayout::Padded => format!(
            "{}{}{:0width$}",
            currency.as_str(),
            KEY_SEPARATOR,
            bucket_start,
            width = PADDED_DIGITS
        ),
    }
}

/// Inverse of `bucket_key`; accepts either layout
pub fn decode_key(key: &str) -> Result<(SupportedCurrency, i64)> {
    let (label, secs) = key
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| PriceError::MalformedKey(key.to_string()))?;
    let currency =
        SupportedCurrency::from_code(label).ok_or_else(|| PriceError::MalformedKey(key.to_string()))?;
    let bucket_start = secs
        .parse::<i64>()
        .map_err(|_| PriceError::MalformedKey(key.to_string()))?;
    Ok((currency, bucket_start))
}

/// Serialize a quote normalized to its bucket start
pub fn encode_value(quote: &PriceQuote, bucket_start: i64) -> Result<Vec<u8>> {
    let stored = PriceQuote {
        observed_at_millis: bucket_start.saturating_mul(1000),
        ..quote.clone()
    };
    Ok(serde_json::to_vec(&stored)?)
}

pub fn decode_value(bytes: &[u8]) -> Result<PriceQuote> {
    Ok(serde_json::from_slice(bytes)?)
}
