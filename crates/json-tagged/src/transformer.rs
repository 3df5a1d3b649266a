//! Type transformers: the bridge between special values and their
//! JSON-native tagged payloads.

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;

use crate::error::CodecError;
use crate::value::Value;

/// One entry of the codec's type registry.
///
/// [`code`](TypeTransformer::code) keys the tagged wrapper on the wire.
/// [`applies`](TypeTransformer::applies) selects values in the encode
/// direction; entries are consulted in registration order and the first
/// match wins. [`encode`](TypeTransformer::encode) is called only for
/// values `applies` accepted and must produce a JSON scalar payload
/// (`Str` or `Num`) that [`decode`](TypeTransformer::decode) reverses.
pub trait TypeTransformer {
    /// Human-readable label, used in error messages.
    fn name(&self) -> &'static str;
    /// Short unique code following the tag sentinel on the wire.
    fn code(&self) -> &'static str;
    fn applies(&self, value: &Value) -> bool;
    fn encode(&self, value: &Value) -> Value;
    fn decode(&self, payload: &Value) -> Result<Value, CodecError>;
}

fn payload_str<'a>(name: &'static str, payload: &'a Value) -> Result<&'a str, CodecError> {
    match payload {
        Value::Str(s) => Ok(s),
        other => Err(CodecError::InvalidPayload {
            name,
            reason: format!("expected string payload, got {other:?}"),
        }),
    }
}

/// `u`: the absent-value marker. The payload (the number `1`) carries no
/// information; the tag alone does.
pub(crate) struct UndefinedTransformer;

impl TypeTransformer for UndefinedTransformer {
    fn name(&self) -> &'static str {
        "Undefined"
    }

    fn code(&self) -> &'static str {
        "u"
    }

    fn applies(&self, value: &Value) -> bool {
        matches!(value, Value::Undefined)
    }

    fn encode(&self, _value: &Value) -> Value {
        Value::Num(1.into())
    }

    fn decode(&self, _payload: &Value) -> Result<Value, CodecError> {
        Ok(Value::Undefined)
    }
}

/// `i`: arbitrary-precision integer as a decimal digit string.
pub(crate) struct BigIntTransformer;

impl TypeTransformer for BigIntTransformer {
    fn name(&self) -> &'static str {
        "BigInt"
    }

    fn code(&self) -> &'static str {
        "i"
    }

    fn applies(&self, value: &Value) -> bool {
        matches!(value, Value::BigInt(_))
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::BigInt(n) => Value::Str(n.to_string()),
            _ => unreachable!(),
        }
    }

    fn decode(&self, payload: &Value) -> Result<Value, CodecError> {
        let digits = payload_str(self.name(), payload)?;
        let n: BigInt = digits.parse().map_err(|_| CodecError::InvalidPayload {
            name: self.name(),
            reason: format!("not a decimal integer: {digits:?}"),
        })?;
        Ok(Value::BigInt(n))
    }
}

/// `b`: raw bytes as standard base64 text.
pub(crate) struct BinTransformer;

impl TypeTransformer for BinTransformer {
    fn name(&self) -> &'static str {
        "Bin"
    }

    fn code(&self) -> &'static str {
        "b"
    }

    fn applies(&self, value: &Value) -> bool {
        matches!(value, Value::Bin(_))
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Bin(bytes) => {
                Value::Str(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            _ => unreachable!(),
        }
    }

    fn decode(&self, payload: &Value) -> Result<Value, CodecError> {
        let text = payload_str(self.name(), payload)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(text)
            .map_err(|err| CodecError::InvalidPayload {
                name: self.name(),
                reason: err.to_string(),
            })?;
        Ok(Value::Bin(bytes))
    }
}

/// `d`: UTC timestamp as an ISO-8601 string with millisecond precision and
/// a `Z` suffix.
pub(crate) struct DateTransformer;

impl TypeTransformer for DateTransformer {
    fn name(&self) -> &'static str {
        "Date"
    }

    fn code(&self) -> &'static str {
        "d"
    }

    fn applies(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Date(dt) => Value::Str(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            _ => unreachable!(),
        }
    }

    fn decode(&self, payload: &Value) -> Result<Value, CodecError> {
        let text = payload_str(self.name(), payload)?;
        let dt = DateTime::parse_from_rfc3339(text).map_err(|err| CodecError::InvalidPayload {
            name: self.name(),
            reason: err.to_string(),
        })?;
        Ok(Value::Date(dt.with_timezone(&Utc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigint_survives_values_beyond_u64() {
        let t = BigIntTransformer;
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let payload = t.encode(&Value::BigInt(big.clone()));
        assert_eq!(payload, Value::Str("123456789012345678901234567890".into()));
        assert_eq!(t.decode(&payload).unwrap(), Value::BigInt(big));
    }

    #[test]
    fn bigint_rejects_garbage_digits() {
        let t = BigIntTransformer;
        assert!(matches!(
            t.decode(&Value::Str("12x".into())),
            Err(CodecError::InvalidPayload { name: "BigInt", .. })
        ));
    }

    #[test]
    fn bin_uses_standard_base64() {
        let t = BinTransformer;
        let payload = t.encode(&Value::bin(*b"\xde\xad\xbe\xaf"));
        assert_eq!(payload, Value::Str("3q2+rw==".into()));
        assert_eq!(t.decode(&payload).unwrap(), Value::bin(*b"\xde\xad\xbe\xaf"));
    }

    #[test]
    fn date_formats_millis_utc() {
        let t = DateTransformer;
        let date = Value::date_ms(1_234_567_891_234).unwrap();
        let payload = t.encode(&date);
        assert_eq!(payload, Value::Str("2009-02-13T23:31:31.234Z".into()));
        assert_eq!(t.decode(&payload).unwrap(), date);
    }

    #[test]
    fn date_accepts_offset_input_and_normalises_to_utc() {
        let t = DateTransformer;
        let decoded = t
            .decode(&Value::Str("2009-02-14T00:31:31.234+01:00".into()))
            .unwrap();
        assert_eq!(decoded, Value::date_ms(1_234_567_891_234).unwrap());
    }

    #[test]
    fn non_string_payloads_are_rejected() {
        for t in [&BigIntTransformer as &dyn TypeTransformer, &BinTransformer, &DateTransformer] {
            assert!(matches!(
                t.decode(&Value::Num(5.into())),
                Err(CodecError::InvalidPayload { .. })
            ));
        }
    }
}
