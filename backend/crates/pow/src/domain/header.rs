//! Hashcash Header
//!
//! Wire form: `version:bits:date:resource:extension:random:counter`, e.g.
//! `1:12:2208082121:d778f1e9-d0a8-485e-ab51-053a12e9b397::cRvZdlXCCIrWoQ==:NDAwMjk4NDM4NTU1MTUyNDEzOA==`.
//!
//! `counter` travels as the base64 of its decimal text, not of the integer bytes.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use platform::crypto::{from_base64, to_base64};

use crate::error::HeaderError;

/// The only supported protocol version
pub const VERSION: u8 = 1;

/// `YYMMDDHHMM`
pub const DATE_FORMAT: &str = "%y%m%d%H%M";

/// Length in bytes of the random nonce before encoding
pub const RANDOM_LEN: usize = 10;

const DATE_LEN: usize = 10;

/// Hashcash header
///
/// The extension field is reserved and always serialized empty. Two headers
/// describe the same challenge when every field but `counter` is equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub bits: u32,
    pub date: String,
    pub resource: String,
    /// Base64 of the random nonce, stored pre-encoded
    pub random: String,
    pub counter: i64,
}

impl Header {
    /// Header stamped with the current UTC minute
    pub fn new(bits: u32, resource: impl Into<String>, random: &[u8], counter: i64) -> Self {
        Self {
            version: VERSION,
            bits,
            date: Utc::now().format(DATE_FORMAT).to_string(),
            resource: resource.into(),
            random: to_base64(random),
            counter,
        }
    }

    pub fn parse(s: &str) -> Result<Self, HeaderError> {
        let fields: Vec<&str> = s.split(':').collect();
        let [version, bits, date, resource, _extension, random, counter] = fields.as_slice() else {
            return Err(HeaderError::MalformedHeader(s.to_string()));
        };

        let version = version
            .parse::<i64>()
            .map_err(HeaderError::InvalidVersion)?;
        if version != i64::from(VERSION) {
            return Err(HeaderError::UnsupportedVersion(version));
        }

        let bits = bits.parse::<u32>().map_err(HeaderError::InvalidBits)?;
        check_date(date)?;

        Ok(Self {
            version: VERSION,
            bits,
            date: date.to_string(),
            resource: resource.to_string(),
            random: random.to_string(),
            counter: decode_counter(counter)?,
        })
    }

    /// Whether `other` answers the same challenge (counter aside)
    pub fn same_challenge(&self, other: &Header) -> bool {
        self.version == other.version
            && self.bits == other.bits
            && self.date == other.date
            && self.resource == other.resource
            && self.random == other.random
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}::{}:{}",
            self.version,
            self.bits,
            self.date,
            self.resource,
            self.random,
            encode_counter(self.counter)
        )
    }
}

impl FromStr for Header {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Header::parse(s)
    }
}

pub fn encode_counter(counter: i64) -> String {
    to_base64(counter.to_string().as_bytes())
}

fn decode_counter(field: &str) -> Result<i64, HeaderError> {
    let decoded = from_base64(field).map_err(HeaderError::InvalidCounterEncoding)?;
    let text = String::from_utf8(decoded).map_err(|e| HeaderError::InvalidCounter(e.to_string()))?;
    text.parse::<i64>()
        .map_err(|e| HeaderError::InvalidCounter(format!("{text}: {e}")))
}

/// Syntactic check only; stale dates are accepted
fn check_date(date: &str) -> Result<(), HeaderError> {
    let fixed_width = date.len() == DATE_LEN && date.bytes().all(|b| b.is_ascii_digit());
    if !fixed_width || NaiveDateTime::parse_from_str(date, DATE_FORMAT).is_err() {
        return Err(HeaderError::InvalidDate(date.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHALLENGE: &str = "1:12:2208082121:d778f1e9-d0a8-485e-ab51-053a12e9b397::cRvZdlXCCIrWoQ==:NDAwMjk4NDM4NTU1MTUyNDEzOA==";

    #[test]
    fn test_parse_known_header() {
        let header = Header::parse("1:2:2201010000:resource::cmFuZG9t:MTAwMA==").unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.bits, 2);
        assert_eq!(header.date, "2201010000");
        assert_eq!(header.resource, "resource");
        assert_eq!(header.random, "cmFuZG9t");
        assert_eq!(header.counter, 1000);
    }

    #[test]
    fn test_display_matches_wire_form() {
        let header: Header = CHALLENGE.parse().unwrap();
        assert_eq!(header.counter, 4002984385551524138);
        assert_eq!(header.to_string(), CHALLENGE);
    }

    #[test]
    fn test_counter_encodes_decimal_text() {
        assert_eq!(encode_counter(1000), "MTAwMA==");
        assert_eq!(encode_counter(-1), "LTE=");
        assert_eq!(decode_counter("LTE=").unwrap(), -1);
        assert_eq!(
            decode_counter(&encode_counter(i64::MIN)).unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn test_new_header_round_trips() {
        let header = Header::new(20, "resource", &[7u8; RANDOM_LEN], i64::MAX);
        assert_eq!(header.version, VERSION);
        assert_eq!(header.date.len(), 10);
        assert_eq!(header.random, "BwcHBwcHBwcHBw==");

        let parsed = Header::parse(&header.to_string()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_extension_is_ignored() {
        let header =
            Header::parse("1:2:2201010000:resource:ext:cmFuZG9t:MTAwMA==").unwrap();
        assert_eq!(header.to_string(), "1:2:2201010000:resource::cmFuZG9t:MTAwMA==");
    }

    #[test]
    fn test_same_challenge_ignores_counter() {
        let challenge = Header::parse(CHALLENGE).unwrap();
        let mut result = challenge.clone();
        result.counter += 1;
        assert!(challenge.same_challenge(&result));

        let mut other = challenge.clone();
        other.random = "AAAAAAAAAAAAAA==".to_string();
        assert!(!challenge.same_challenge(&other));
    }

    #[test]
    fn test_malformed_field_count() {
        for input in ["", "1:2:3", "1:2:2201010000:resource::cmFuZG9t:MTAwMA==:extra"] {
            assert!(matches!(
                Header::parse(input),
                Err(HeaderError::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn test_version_errors_are_distinct() {
        assert!(matches!(
            Header::parse("x:2:2201010000:resource::cmFuZG9t:MTAwMA=="),
            Err(HeaderError::InvalidVersion(_))
        ));
        assert_eq!(
            Header::parse("2:2:2201010000:resource::cmFuZG9t:MTAwMA=="),
            Err(HeaderError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_bits_must_be_non_negative_integer() {
        for bits in ["-1", "twelve", ""] {
            let input = format!("1:{bits}:2201010000:resource::cmFuZG9t:MTAwMA==");
            assert!(matches!(
                Header::parse(&input),
                Err(HeaderError::InvalidBits(_))
            ));
        }
    }

    #[test]
    fn test_date_must_be_fixed_width() {
        for date in ["220101000", "22010100000", "2201010a00", "2213010000", "2201012500"] {
            let input = format!("1:2:{date}:resource::cmFuZG9t:MTAwMA==");
            assert_eq!(
                Header::parse(&input),
                Err(HeaderError::InvalidDate(date.to_string()))
            );
        }
    }

    #[test]
    fn test_counter_errors_are_distinct() {
        assert!(matches!(
            Header::parse("1:2:2201010000:resource::cmFuZG9t:!!!"),
            Err(HeaderError::InvalidCounterEncoding(_))
        ));
        // base64 of "abc"
        assert!(matches!(
            Header::parse("1:2:2201010000:resource::cmFuZG9t:YWJj"),
            Err(HeaderError::InvalidCounter(_))
        ));
        // base64 of "9223372036854775808"
        assert!(matches!(
            Header::parse("1:2:2201010000:resource::cmFuZG9t:OTIyMzM3MjAzNjg1NDc3NTgwOA=="),
            Err(HeaderError::InvalidCounter(_))
        ));
    }
}
