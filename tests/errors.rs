use {
	avro_typed::{
		schema::{Name, Schema},
		Codec, Error, Value,
	},
	pretty_assertions::assert_eq,
	rust_decimal::Decimal,
};

#[test]
fn byte_decoding_range_checks() {
	assert_eq!(
		Codec::byte()
			.from_value(&Value::Int(128))
			.unwrap_err()
			.to_string(),
		"got unexpected int value 128, expected value in range -128 to 127"
	);
	assert_eq!(
		Codec::short()
			.from_value(&Value::Int(40_000))
			.unwrap_err()
			.to_string(),
		"got unexpected int value 40000, expected value in range -32768 to 32767"
	);
}

#[test]
fn char_decoding_requires_a_single_character() {
	assert_eq!(
		Codec::char()
			.from_value(&Value::String("ab".to_owned()))
			.unwrap_err()
			.to_string(),
		"got unexpected string with length 2, expected length 1"
	);
}

#[test]
fn decimal_encoding_checks_scale_and_precision() {
	let codec = Codec::decimal(5, 2);

	// 12345.67 carries 7 digits, more than the schema's 5
	assert_eq!(
		codec.to_value(&Decimal::new(1_234_567, 2)).unwrap_err(),
		Error::EncodeDecimalPrecisionExceeded {
			precision: 7,
			limit: 5,
		}
	);

	// 1.234 carries scale 3, the schema requires exactly 2
	assert_eq!(
		codec.to_value(&Decimal::new(1_234, 3)).unwrap_err(),
		Error::EncodeDecimalScaleMismatch {
			scale: 3,
			expected: 2,
		}
	);

	assert!(codec.to_value(&Decimal::new(12_345, 2)).is_ok());
}

#[test]
fn decimal_decoding_rechecks_precision() {
	let encoded = Codec::decimal(9, 2)
		.to_value(&Decimal::new(1_234_567, 2))
		.unwrap();
	let narrow = Codec::decimal(5, 2);
	assert_eq!(
		narrow.from_value(&encoded).unwrap_err(),
		Error::DecodeDecimalPrecisionExceeded {
			precision: 7,
			limit: 5,
		}
	);
}

#[test]
fn schema_shape_mismatches_are_schema_type_errors() {
	assert_eq!(
		Codec::int()
			.encode(&42, &Schema::string())
			.unwrap_err()
			.to_string(),
		"got unexpected schema type string while encoding i32, expected one of [int]"
	);
	assert_eq!(
		Codec::bytes()
			.encode(&vec![1], &Schema::long())
			.unwrap_err()
			.to_string(),
		"got unexpected schema type long while encoding Vec<u8>, expected one of [bytes, fixed]"
	);
}

#[test]
fn runtime_tag_mismatches_are_type_errors() {
	assert_eq!(
		Codec::int()
			.from_value(&Value::String("42".to_owned()))
			.unwrap_err()
			.to_string(),
		"got unexpected value of kind string while decoding i32, expected int"
	);
}

#[test]
fn logical_type_mismatches_are_logical_type_errors() {
	// The base kind matches, the logical tag is missing
	assert_eq!(
		Codec::uuid()
			.decode(&Value::String("whatever".to_owned()), &Schema::string())
			.unwrap_err()
			.to_string(),
		"got unexpected logical type none while decoding Uuid"
	);
	assert_eq!(
		Codec::instant()
			.encode(
				&chrono::DateTime::<chrono::Utc>::MIN_UTC,
				&Schema::long(),
			)
			.unwrap_err()
			.to_string(),
		"got unexpected logical type none while encoding DateTime<Utc>"
	);
}

#[test]
fn uuid_decoding_surfaces_parse_failures() {
	let error = Codec::uuid()
		.from_value(&Value::String("not-a-uuid".to_owned()))
		.unwrap_err();
	assert!(matches!(error, Error::Message(_)));
	assert!(error.to_string().starts_with("unable to parse uuid"));
}

#[test]
fn fixed_size_overflows_are_rejected_both_ways() {
	let two_wide = Schema::fixed(Name::new("F").unwrap(), 2);
	assert_eq!(
		Codec::bytes()
			.encode(&vec![1, 2, 3], &two_wide)
			.unwrap_err(),
		Error::EncodeExceedsFixedSize { length: 3, max: 2 }
	);

	let four_wide = Schema::fixed(Name::new("F").unwrap(), 4);
	let encoded = Codec::bytes().encode(&vec![1, 2, 3], &four_wide).unwrap();
	assert_eq!(
		Codec::bytes().decode(&encoded, &two_wide).unwrap_err(),
		Error::DecodeExceedsFixedSize { length: 3, max: 2 }
	);
}

#[test]
fn options_reject_other_union_shapes() {
	let codec = Codec::option(Codec::int());
	let not_nullable = Schema::union(vec![Schema::int(), Schema::string()]).unwrap();
	assert!(matches!(
		codec.encode(&Some(1), &not_nullable).unwrap_err(),
		Error::EncodeUnexpectedOptionSchema { .. }
	));
	assert!(matches!(
		codec.decode(&Value::Int(1), &not_nullable).unwrap_err(),
		Error::DecodeUnexpectedOptionSchema { .. }
	));
}
