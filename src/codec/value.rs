use chrono::{DateTime, Utc};
use crate::codec::date::parse_date;
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::property::PropertyType;

const INT_SIGN: u32 = 1 << 31;
const LONG_SIGN: u64 = 1 << 63;

/// Typed literal after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Date(DateTime<Utc>),
    Int(i32),
    Long(i64),
    Boolean(bool),
    Principal(String),
}

impl Value {
    /// Numeric view used by long-encoded fields (dates as epoch millis).
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Date(d) => Some(d.timestamp_millis()),
            _ => None,
        }
    }
}

/// Encodes literals into index term bytes.
///
/// Numbers use a sign-flipped big-endian layout so that byte-lexical order
/// equals numeric order; range evaluation relies on that.
pub struct ValueCodec;

impl ValueCodec {
    pub fn parse(property_type: PropertyType, literal: &str) -> Result<Value> {
        match property_type {
            PropertyType::String
            | PropertyType::Html
            | PropertyType::Json
            | PropertyType::ImageRef => Ok(Value::String(literal.to_string())),
            PropertyType::Boolean => parse_boolean(literal).map(Value::Boolean),
            PropertyType::Principal => {
                let name = literal.trim();
                if name.is_empty() {
                    return Err(Error::new(ErrorKind::Parse, "empty principal name"));
                }
                Ok(Value::Principal(name.to_string()))
            }
            PropertyType::Date | PropertyType::Timestamp => parse_date(literal).map(Value::Date),
            PropertyType::Int => literal
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| Error::new(ErrorKind::Parse, format!("'{}' is not a valid int", literal))),
            PropertyType::Long => literal
                .trim()
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|_| Error::new(ErrorKind::Parse, format!("'{}' is not a valid long", literal))),
        }
    }

    pub fn encode(value: &Value) -> Vec<u8> {
        match value {
            Value::String(s) | Value::Principal(s) => s.as_bytes().to_vec(),
            Value::Boolean(b) => if *b { b"true".to_vec() } else { b"false".to_vec() },
            Value::Int(v) => Self::encode_int(*v).to_vec(),
            Value::Long(v) => Self::encode_long(*v).to_vec(),
            Value::Date(d) => Self::encode_long(d.timestamp_millis()).to_vec(),
        }
    }

    pub fn encode_literal(property_type: PropertyType, literal: &str) -> Result<Vec<u8>> {
        Ok(Self::encode(&Self::parse(property_type, literal)?))
    }

    pub fn encode_int(value: i32) -> [u8; 4] {
        ((value as u32) ^ INT_SIGN).to_be_bytes()
    }

    pub fn encode_long(value: i64) -> [u8; 8] {
        ((value as u64) ^ LONG_SIGN).to_be_bytes()
    }
}

fn parse_boolean(literal: &str) -> Result<bool> {
    match literal.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::new(ErrorKind::Parse, format!("'{}' is not a boolean", literal))),
    }
}
