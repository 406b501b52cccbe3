use crate::{
	schema::{LogicalType, Schema, SchemaError, SchemaKind},
	value::ValueKind,
};

/// Any error produced by a [`Codec`](crate::Codec)
///
/// Every failure class carries enough context to render a deterministic,
/// human-readable message; assert on [`ToString::to_string`] in tests.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error(
		"got unexpected schema type {actual} while encoding {type_label}, expected one of [{}]",
		join_kinds(.expected)
	)]
	EncodeUnexpectedSchemaType {
		type_label: String,
		actual: SchemaKind,
		expected: Vec<SchemaKind>,
	},
	#[error(
		"got unexpected schema type {actual} while decoding {type_label}, expected one of [{}]",
		join_kinds(.expected)
	)]
	DecodeUnexpectedSchemaType {
		type_label: String,
		actual: SchemaKind,
		expected: Vec<SchemaKind>,
	},
	#[error(
		"got unexpected logical type {} while encoding {type_label}",
		fmt_logical(.actual)
	)]
	EncodeUnexpectedLogicalType {
		type_label: String,
		actual: Option<LogicalType>,
	},
	#[error(
		"got unexpected logical type {} while decoding {type_label}",
		fmt_logical(.actual)
	)]
	DecodeUnexpectedLogicalType {
		type_label: String,
		actual: Option<LogicalType>,
	},
	#[error("got unexpected value of kind {actual} while encoding {type_label}, expected {expected}")]
	EncodeUnexpectedType {
		type_label: String,
		expected: ValueKind,
		actual: ValueKind,
	},
	#[error("got unexpected value of kind {actual} while decoding {type_label}, expected {expected}")]
	DecodeUnexpectedType {
		type_label: String,
		expected: ValueKind,
		actual: ValueKind,
	},
	#[error("unable to encode {expected} using schema with name {schema_name} since names do not match")]
	EncodeNameMismatch {
		schema_name: String,
		expected: String,
	},
	#[error("unable to decode {expected} using schema with name {schema_name} since names do not match")]
	DecodeNameMismatch {
		schema_name: String,
		expected: String,
	},
	#[error("got record with name {actual}, expected name {expected}")]
	DecodeUnexpectedRecordName { actual: String, expected: String },
	#[error("record schema is missing field {field} while encoding {type_label}")]
	EncodeMissingRecordField { field: String, type_label: String },
	#[error("record schema is missing field {field} and no default is declared while decoding {type_label}")]
	DecodeMissingRecordField { field: String, type_label: String },
	#[error(
		"symbol {symbol} is not part of schema symbols [{}] while encoding {type_label}",
		.symbols.join(", ")
	)]
	EncodeSymbolNotInSchema {
		symbol: String,
		symbols: Vec<String>,
		type_label: String,
	},
	#[error(
		"symbol {symbol} is not part of schema symbols [{}] while decoding {type_label}",
		.symbols.join(", ")
	)]
	DecodeSymbolNotInSchema {
		symbol: String,
		symbols: Vec<String>,
		type_label: String,
	},
	#[error("missing schema {name} in union while encoding {type_label}")]
	EncodeMissingUnionSchema { name: String, type_label: String },
	#[error("missing schema {name} in union while decoding {type_label}")]
	DecodeMissingUnionSchema { name: String, type_label: String },
	#[error("missing alternative {name} in union while decoding {type_label}")]
	DecodeMissingUnionAlternative { name: String, type_label: String },
	#[error("exhausted alternatives while encoding {type_label}")]
	EncodeExhaustedAlternatives { type_label: String },
	#[error("exhausted alternatives for value of kind {actual} while decoding {type_label}")]
	DecodeExhaustedAlternatives {
		actual: ValueKind,
		type_label: String,
	},
	#[error("unable to encode decimal with precision {precision} exceeding schema precision {limit}")]
	EncodeDecimalPrecisionExceeded { precision: u32, limit: u32 },
	#[error("unable to decode decimal with precision {precision} exceeding schema precision {limit}")]
	DecodeDecimalPrecisionExceeded { precision: u32, limit: u32 },
	#[error("unable to encode decimal with scale {scale} as scale {expected}")]
	EncodeDecimalScaleMismatch { scale: u32, expected: u32 },
	#[error("unable to encode {length} bytes exceeding fixed schema size {max}")]
	EncodeExceedsFixedSize { length: usize, max: usize },
	#[error("unable to decode {length} bytes exceeding fixed schema size {max}")]
	DecodeExceedsFixedSize { length: usize, max: usize },
	#[error("got unexpected int value {value}, expected value in range -128 to 127")]
	UnexpectedByte { value: i32 },
	#[error("got unexpected int value {value}, expected value in range -32768 to 32767")]
	UnexpectedShort { value: i32 },
	#[error("got unexpected string with length {length}, expected length 1")]
	UnexpectedChar { length: usize },
	#[error("got unexpected empty collection while decoding {type_label}")]
	DecodeEmptyCollection { type_label: String },
	#[error("got unexpected union schema {schema} while encoding option")]
	EncodeUnexpectedOptionSchema { schema: Schema },
	#[error("got unexpected union schema {schema} while decoding option")]
	DecodeUnexpectedOptionSchema { schema: Schema },
	/// Schema construction or parsing rejected by the runtime
	#[error(transparent)]
	Schema(#[from] SchemaError),
	/// Failure surfaced from an external parser (uuid, temporal range, ...)
	#[error("{0}")]
	Message(String),
}

impl Error {
	/// If you need a dynamic message use `Error::message(format_args!(...))`
	pub(crate) fn message(message: impl std::fmt::Display) -> Self {
		Self::Message(message.to_string())
	}

	pub(crate) fn encode_schema_mismatch(
		type_label: &str,
		schema: &Schema,
		expected: &[SchemaKind],
	) -> Self {
		Self::EncodeUnexpectedSchemaType {
			type_label: type_label.to_owned(),
			actual: schema.kind(),
			expected: expected.to_vec(),
		}
	}

	pub(crate) fn decode_schema_mismatch(
		type_label: &str,
		schema: &Schema,
		expected: &[SchemaKind],
	) -> Self {
		Self::DecodeUnexpectedSchemaType {
			type_label: type_label.to_owned(),
			actual: schema.kind(),
			expected: expected.to_vec(),
		}
	}

	pub(crate) fn decode_type_mismatch(
		type_label: &str,
		expected: ValueKind,
		actual: &crate::value::Value,
	) -> Self {
		Self::DecodeUnexpectedType {
			type_label: type_label.to_owned(),
			expected,
			actual: actual.kind(),
		}
	}
}

fn join_kinds(kinds: &[SchemaKind]) -> String {
	kinds
		.iter()
		.map(|kind| kind.to_string())
		.collect::<Vec<_>>()
		.join(", ")
}

fn fmt_logical(logical_type: &Option<LogicalType>) -> String {
	match logical_type {
		Some(logical_type) => logical_type.as_str().to_owned(),
		None => "none".to_owned(),
	}
}
