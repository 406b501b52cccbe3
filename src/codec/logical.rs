//! Codecs for the logical types layered over primitives: `uuid`,
//! `timestamp-millis`, `date` and `decimal`

use {
	chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc},
	rust_decimal::Decimal,
	uuid::Uuid,
};

use super::Codec;
use crate::{
	error::Error,
	schema::{LogicalType, Schema, SchemaKind},
	value::{Value, ValueKind},
};

// Days between 0001-01-01 (CE day 1) and the Unix epoch
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

impl Codec<Uuid> {
	/// Codec for UUIDs, written as an Avro `string` with the `uuid` logical
	/// type
	pub fn uuid() -> Self {
		Self::new(
			Ok(Schema::uuid()),
			|value: &Uuid, schema| {
				expect_logical_encode(schema, SchemaKind::String, LogicalType::Uuid, "Uuid")?;
				Ok(Value::String(value.to_string()))
			},
			|value, schema| {
				expect_logical_decode(schema, SchemaKind::String, LogicalType::Uuid, "Uuid")?;
				match value {
					Value::String(s) => Uuid::parse_str(s)
						.map_err(|e| Error::message(format!("unable to parse uuid: {e}"))),
					other => Err(Error::decode_type_mismatch("Uuid", ValueKind::String, other)),
				}
			},
		)
	}
}

impl Codec<DateTime<Utc>> {
	/// Codec for instants, written as an Avro `long` holding epoch
	/// milliseconds with the `timestamp-millis` logical type
	///
	/// Sub-millisecond precision is truncated on encode, so round-trips are
	/// only exact at millisecond granularity.
	pub fn instant() -> Self {
		Self::new(
			Ok(Schema::timestamp_millis()),
			|value: &DateTime<Utc>, schema| {
				expect_logical_encode(
					schema,
					SchemaKind::Long,
					LogicalType::TimestampMillis,
					"DateTime<Utc>",
				)?;
				Ok(Value::Long(value.timestamp_millis()))
			},
			|value, schema| {
				expect_logical_decode(
					schema,
					SchemaKind::Long,
					LogicalType::TimestampMillis,
					"DateTime<Utc>",
				)?;
				match value {
					Value::Long(millis) => Utc
						.timestamp_millis_opt(*millis)
						.single()
						.ok_or_else(|| {
							Error::message(format!("invalid epoch millisecond {millis}"))
						}),
					other => Err(Error::decode_type_mismatch(
						"DateTime<Utc>",
						ValueKind::Long,
						other,
					)),
				}
			},
		)
	}
}

impl Codec<NaiveDate> {
	/// Codec for dates, written as an Avro `int` holding days since the Unix
	/// epoch with the `date` logical type
	pub fn local_date() -> Self {
		Self::new(
			Ok(Schema::date()),
			|value: &NaiveDate, schema| {
				expect_logical_encode(schema, SchemaKind::Int, LogicalType::Date, "NaiveDate")?;
				Ok(Value::Int(value.num_days_from_ce() - EPOCH_DAYS_FROM_CE))
			},
			|value, schema| {
				expect_logical_decode(schema, SchemaKind::Int, LogicalType::Date, "NaiveDate")?;
				match value {
					Value::Int(days) => days
						.checked_add(EPOCH_DAYS_FROM_CE)
						.and_then(NaiveDate::from_num_days_from_ce_opt)
						.ok_or_else(|| Error::message(format!("invalid epoch day {days}"))),
					other => Err(Error::decode_type_mismatch("NaiveDate", ValueKind::Int, other)),
				}
			},
		)
	}
}

impl Codec<Decimal> {
	/// Codec for decimals, written as Avro `bytes` holding the
	/// two's-complement big-endian unscaled value, with the
	/// `decimal(precision, scale)` logical type
	///
	/// Encoding requires the value's scale to equal the schema scale and its
	/// precision to fit the schema precision; decoding re-checks precision.
	pub fn decimal(precision: u32, scale: u32) -> Self {
		let schema = Schema::decimal(precision, scale).map_err(Error::from);
		Self::new(
			schema,
			|value: &Decimal, schema| {
				let (precision, scale) = decimal_parameters_encode(schema)?;
				if value.scale() != scale {
					return Err(Error::EncodeDecimalScaleMismatch {
						scale: value.scale(),
						expected: scale,
					});
				}
				let digits = digit_count(value.mantissa());
				if digits > precision {
					return Err(Error::EncodeDecimalPrecisionExceeded {
						precision: digits,
						limit: precision,
					});
				}
				Ok(Value::Bytes(unscaled_to_big_endian(value.mantissa())))
			},
			|value, schema| {
				let (precision, scale) = decimal_parameters_decode(schema)?;
				match value {
					Value::Bytes(bytes) => {
						let unscaled = unscaled_from_big_endian(bytes)?;
						let digits = digit_count(unscaled);
						if digits > precision {
							return Err(Error::DecodeDecimalPrecisionExceeded {
								precision: digits,
								limit: precision,
							});
						}
						Decimal::try_from_i128_with_scale(unscaled, scale)
							.map_err(|e| Error::message(format!("unable to decode decimal: {e}")))
					}
					other => Err(Error::decode_type_mismatch("Decimal", ValueKind::Bytes, other)),
				}
			},
		)
	}
}

fn expect_logical_encode(
	schema: &Schema,
	kind: SchemaKind,
	logical_type: LogicalType,
	type_label: &str,
) -> Result<(), Error> {
	if schema.kind() != kind {
		return Err(Error::encode_schema_mismatch(type_label, schema, &[kind]));
	}
	match schema.logical_type() {
		Some(actual) if *actual == logical_type => Ok(()),
		actual => Err(Error::EncodeUnexpectedLogicalType {
			type_label: type_label.to_owned(),
			actual: actual.copied(),
		}),
	}
}

fn expect_logical_decode(
	schema: &Schema,
	kind: SchemaKind,
	logical_type: LogicalType,
	type_label: &str,
) -> Result<(), Error> {
	if schema.kind() != kind {
		return Err(Error::decode_schema_mismatch(type_label, schema, &[kind]));
	}
	match schema.logical_type() {
		Some(actual) if *actual == logical_type => Ok(()),
		actual => Err(Error::DecodeUnexpectedLogicalType {
			type_label: type_label.to_owned(),
			actual: actual.copied(),
		}),
	}
}

fn decimal_parameters_encode(schema: &Schema) -> Result<(u32, u32), Error> {
	if schema.kind() != SchemaKind::Bytes {
		return Err(Error::encode_schema_mismatch(
			"Decimal",
			schema,
			&[SchemaKind::Bytes],
		));
	}
	match schema.logical_type() {
		Some(&LogicalType::Decimal { precision, scale }) => Ok((precision, scale)),
		actual => Err(Error::EncodeUnexpectedLogicalType {
			type_label: "Decimal".to_owned(),
			actual: actual.copied(),
		}),
	}
}

fn decimal_parameters_decode(schema: &Schema) -> Result<(u32, u32), Error> {
	if schema.kind() != SchemaKind::Bytes {
		return Err(Error::decode_schema_mismatch(
			"Decimal",
			schema,
			&[SchemaKind::Bytes],
		));
	}
	match schema.logical_type() {
		Some(&LogicalType::Decimal { precision, scale }) => Ok((precision, scale)),
		actual => Err(Error::DecodeUnexpectedLogicalType {
			type_label: "Decimal".to_owned(),
			actual: actual.copied(),
		}),
	}
}

fn digit_count(unscaled: i128) -> u32 {
	unscaled.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

/// Minimal two's-complement big-endian representation of the unscaled value
fn unscaled_to_big_endian(unscaled: i128) -> Vec<u8> {
	let bytes = unscaled.to_be_bytes();
	let mut start = 0;
	while start < bytes.len() - 1 {
		let sign_extension = match bytes[start] {
			0x00 => bytes[start + 1] & 0x80 == 0,
			0xFF => bytes[start + 1] & 0x80 != 0,
			_ => false,
		};
		if !sign_extension {
			break;
		}
		start += 1;
	}
	bytes[start..].to_vec()
}

fn unscaled_from_big_endian(bytes: &[u8]) -> Result<i128, Error> {
	match bytes.first() {
		None => Ok(0),
		Some(&first) => {
			if bytes.len() > 16 {
				return Err(Error::message(format!(
					"unable to decode decimal from {} bytes, expected at most 16",
					bytes.len()
				)));
			}
			let sign_extension = if first & 0x80 != 0 { 0xFF } else { 0x00 };
			let mut buf = [sign_extension; 16];
			buf[16 - bytes.len()..].copy_from_slice(bytes);
			Ok(i128::from_be_bytes(buf))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unscaled_round_trips_minimally() {
		for unscaled in [0i128, 1, -1, 127, 128, -128, -129, 123_456, i128::from(i64::MAX)] {
			let bytes = unscaled_to_big_endian(unscaled);
			assert_eq!(unscaled_from_big_endian(&bytes).unwrap(), unscaled);
		}
		assert_eq!(unscaled_to_big_endian(0), [0x00]);
		assert_eq!(unscaled_to_big_endian(127), [0x7F]);
		assert_eq!(unscaled_to_big_endian(128), [0x00, 0x80]);
		assert_eq!(unscaled_to_big_endian(-128), [0x80]);
		assert_eq!(unscaled_to_big_endian(-129), [0xFF, 0x7F]);
	}

	#[test]
	fn digit_count_counts_the_unscaled_digits() {
		assert_eq!(digit_count(0), 1);
		assert_eq!(digit_count(9), 1);
		assert_eq!(digit_count(-10), 2);
		assert_eq!(digit_count(123_456), 6);
	}
}
