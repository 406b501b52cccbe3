//! Codecs for the scalar Avro types

use super::Codec;
use crate::{
	error::Error,
	schema::{Name, Schema, SchemaKind},
	value::{Fixed, Value, ValueKind},
};

impl Codec<()> {
	/// Codec for the unit value, written as Avro `null`
	pub fn null() -> Self {
		Self::new(
			Ok(Schema::null()),
			|_, schema| match schema.kind() {
				SchemaKind::Null => Ok(Value::Null),
				_ => Err(Error::encode_schema_mismatch("()", schema, &[SchemaKind::Null])),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Null {
					return Err(Error::decode_schema_mismatch("()", schema, &[SchemaKind::Null]));
				}
				match value {
					Value::Null => Ok(()),
					other => Err(Error::decode_type_mismatch("()", ValueKind::Null, other)),
				}
			},
		)
	}
}

impl Codec<bool> {
	pub fn boolean() -> Self {
		Self::new(
			Ok(Schema::boolean()),
			|&value, schema| match schema.kind() {
				SchemaKind::Boolean => Ok(Value::Boolean(value)),
				_ => Err(Error::encode_schema_mismatch(
					"bool",
					schema,
					&[SchemaKind::Boolean],
				)),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Boolean {
					return Err(Error::decode_schema_mismatch(
						"bool",
						schema,
						&[SchemaKind::Boolean],
					));
				}
				match value {
					Value::Boolean(value) => Ok(*value),
					other => Err(Error::decode_type_mismatch("bool", ValueKind::Boolean, other)),
				}
			},
		)
	}
}

impl Codec<i32> {
	pub fn int() -> Self {
		Self::new(
			Ok(Schema::int()),
			|&value, schema| match schema.kind() {
				SchemaKind::Int => Ok(Value::Int(value)),
				_ => Err(Error::encode_schema_mismatch("i32", schema, &[SchemaKind::Int])),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Int {
					return Err(Error::decode_schema_mismatch("i32", schema, &[SchemaKind::Int]));
				}
				match value {
					Value::Int(value) => Ok(*value),
					other => Err(Error::decode_type_mismatch("i32", ValueKind::Int, other)),
				}
			},
		)
	}
}

impl Codec<i64> {
	pub fn long() -> Self {
		Self::new(
			Ok(Schema::long()),
			|&value, schema| match schema.kind() {
				SchemaKind::Long => Ok(Value::Long(value)),
				_ => Err(Error::encode_schema_mismatch("i64", schema, &[SchemaKind::Long])),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Long {
					return Err(Error::decode_schema_mismatch(
						"i64",
						schema,
						&[SchemaKind::Long],
					));
				}
				match value {
					Value::Long(value) => Ok(*value),
					other => Err(Error::decode_type_mismatch("i64", ValueKind::Long, other)),
				}
			},
		)
	}
}

impl Codec<f32> {
	pub fn float() -> Self {
		Self::new(
			Ok(Schema::float()),
			|&value, schema| match schema.kind() {
				SchemaKind::Float => Ok(Value::Float(value)),
				_ => Err(Error::encode_schema_mismatch(
					"f32",
					schema,
					&[SchemaKind::Float],
				)),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Float {
					return Err(Error::decode_schema_mismatch(
						"f32",
						schema,
						&[SchemaKind::Float],
					));
				}
				match value {
					Value::Float(value) => Ok(*value),
					other => Err(Error::decode_type_mismatch("f32", ValueKind::Float, other)),
				}
			},
		)
	}
}

impl Codec<f64> {
	pub fn double() -> Self {
		Self::new(
			Ok(Schema::double()),
			|&value, schema| match schema.kind() {
				SchemaKind::Double => Ok(Value::Double(value)),
				_ => Err(Error::encode_schema_mismatch(
					"f64",
					schema,
					&[SchemaKind::Double],
				)),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::Double {
					return Err(Error::decode_schema_mismatch(
						"f64",
						schema,
						&[SchemaKind::Double],
					));
				}
				match value {
					Value::Double(value) => Ok(*value),
					other => Err(Error::decode_type_mismatch("f64", ValueKind::Double, other)),
				}
			},
		)
	}
}

impl Codec<String> {
	pub fn string() -> Self {
		Self::new(
			Ok(Schema::string()),
			|value: &String, schema| match schema.kind() {
				SchemaKind::String => Ok(Value::String(value.clone())),
				_ => Err(Error::encode_schema_mismatch(
					"String",
					schema,
					&[SchemaKind::String],
				)),
			},
			|value, schema| {
				if schema.kind() != SchemaKind::String {
					return Err(Error::decode_schema_mismatch(
						"String",
						schema,
						&[SchemaKind::String],
					));
				}
				match value {
					Value::String(value) => Ok(value.clone()),
					other => Err(Error::decode_type_mismatch("String", ValueKind::String, other)),
				}
			},
		)
	}
}

impl Codec<i8> {
	/// Codec for a byte-sized integer, written as Avro `int`
	///
	/// Decoding range-checks the int.
	pub fn byte() -> Self {
		Codec::int().imap_error(
			|value| i8::try_from(value).map_err(|_| Error::UnexpectedByte { value }),
			|&value| i32::from(value),
		)
	}
}

impl Codec<i16> {
	/// Codec for a short integer, written as Avro `int`
	///
	/// Decoding range-checks the int.
	pub fn short() -> Self {
		Codec::int().imap_error(
			|value| i16::try_from(value).map_err(|_| Error::UnexpectedShort { value }),
			|&value| i32::from(value),
		)
	}
}

impl Codec<char> {
	/// Codec for a single character, written as an Avro `string`
	///
	/// Decoding fails on strings whose length is not exactly one character.
	pub fn char() -> Self {
		Codec::string().imap_error(
			|value| {
				let mut chars = value.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => Ok(c),
					_ => Err(Error::UnexpectedChar {
						length: value.chars().count(),
					}),
				}
			},
			|&value| value.to_string(),
		)
	}
}

impl Codec<Vec<u8>> {
	/// Codec for a byte string
	///
	/// Its own schema is `bytes`, but it also encodes to and decodes from
	/// `fixed` schemas, checking the size bound.
	pub fn bytes() -> Self {
		Self::new(
			Ok(Schema::bytes()),
			|value: &Vec<u8>, schema| encode_bytes(value, schema, "Vec<u8>"),
			|value, schema| decode_bytes(value, schema, "Vec<u8>"),
		)
	}

	/// Codec for a byte string with a named `fixed` schema
	///
	/// `name` may be dotted to carry a namespace.
	pub fn fixed(name: &str, size: usize) -> Self {
		let schema = Name::new(name)
			.map(|name| Schema::fixed(name, size))
			.map_err(Error::from);
		Self::new(
			schema,
			|value: &Vec<u8>, schema| encode_bytes(value, schema, "Vec<u8>"),
			|value, schema| decode_bytes(value, schema, "Vec<u8>"),
		)
	}
}

fn encode_bytes(bytes: &[u8], schema: &Schema, type_label: &str) -> Result<Value, Error> {
	match schema.kind() {
		SchemaKind::Bytes => Ok(Value::Bytes(bytes.to_vec())),
		SchemaKind::Fixed => match schema.size() {
			Some(size) if bytes.len() > size => Err(Error::EncodeExceedsFixedSize {
				length: bytes.len(),
				max: size,
			}),
			_ => Ok(Value::Fixed(Fixed::new(schema.clone(), bytes.to_vec()))),
		},
		_ => Err(Error::encode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Bytes, SchemaKind::Fixed],
		)),
	}
}

fn decode_bytes(value: &Value, schema: &Schema, type_label: &str) -> Result<Vec<u8>, Error> {
	match schema.kind() {
		SchemaKind::Bytes => match value {
			Value::Bytes(bytes) => Ok(bytes.clone()),
			other => Err(Error::decode_type_mismatch(type_label, ValueKind::Bytes, other)),
		},
		SchemaKind::Fixed => match value {
			Value::Fixed(fixed) => match schema.size() {
				Some(size) if fixed.bytes().len() > size => Err(Error::DecodeExceedsFixedSize {
					length: fixed.bytes().len(),
					max: size,
				}),
				_ => Ok(fixed.bytes().to_vec()),
			},
			other => Err(Error::decode_type_mismatch(type_label, ValueKind::Fixed, other)),
		},
		_ => Err(Error::decode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Bytes, SchemaKind::Fixed],
		)),
	}
}
