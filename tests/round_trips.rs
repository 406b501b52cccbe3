use {
	avro_typed::{Codec, Error, Value},
	chrono::{NaiveDate, TimeZone, Utc},
	pretty_assertions::assert_eq,
	rust_decimal::Decimal,
	std::collections::{BTreeMap, BTreeSet, HashMap, HashSet},
	uuid::Uuid,
};

#[test]
fn scalars_round_trip() {
	assert_eq!(Codec::null().to_value(&()).unwrap(), Value::Null);
	assert_eq!(Codec::null().from_value(&Value::Null).unwrap(), ());

	assert_eq!(
		Codec::boolean().to_value(&true).unwrap(),
		Value::Boolean(true)
	);
	assert_eq!(
		Codec::boolean().from_value(&Value::Boolean(true)).unwrap(),
		true
	);

	assert_eq!(Codec::int().to_value(&42).unwrap(), Value::Int(42));
	assert_eq!(Codec::int().from_value(&Value::Int(42)).unwrap(), 42);

	assert_eq!(
		Codec::long().to_value(&1_234_567_890_123).unwrap(),
		Value::Long(1_234_567_890_123)
	);
	assert_eq!(
		Codec::long()
			.from_value(&Value::Long(1_234_567_890_123))
			.unwrap(),
		1_234_567_890_123
	);

	assert_eq!(Codec::float().to_value(&1.5).unwrap(), Value::Float(1.5));
	assert_eq!(Codec::double().to_value(&2.5).unwrap(), Value::Double(2.5));

	assert_eq!(
		Codec::string()
			.to_value(&"adsfasdf09809dsf".to_owned())
			.unwrap(),
		Value::String("adsfasdf09809dsf".to_owned())
	);
}

#[test]
fn narrow_integers_round_trip() {
	assert_eq!(Codec::byte().to_value(&-128i8).unwrap(), Value::Int(-128));
	assert_eq!(Codec::byte().from_value(&Value::Int(127)).unwrap(), 127i8);

	assert_eq!(
		Codec::short().to_value(&-32_768i16).unwrap(),
		Value::Int(-32_768)
	);
	assert_eq!(
		Codec::short().from_value(&Value::Int(32_767)).unwrap(),
		32_767i16
	);

	assert_eq!(
		Codec::char().to_value(&'x').unwrap(),
		Value::String("x".to_owned())
	);
	assert_eq!(
		Codec::char()
			.from_value(&Value::String("x".to_owned()))
			.unwrap(),
		'x'
	);
}

#[test]
fn bytes_round_trip() {
	let codec = Codec::bytes();
	let encoded = codec.to_value(&b"12345abcd".to_vec()).unwrap();
	assert_eq!(encoded, Value::Bytes(b"12345abcd".to_vec()));
	assert_eq!(codec.from_value(&encoded).unwrap(), b"12345abcd".to_vec());
}

#[test]
fn fixed_round_trips_through_its_named_schema() {
	let codec = Codec::fixed("test.Id", 4);
	let encoded = codec.to_value(&vec![1, 2, 3, 4]).unwrap();
	match &encoded {
		Value::Fixed(fixed) => {
			assert_eq!(fixed.schema().full_name(), Some("test.Id"));
			assert_eq!(fixed.bytes(), [1, 2, 3, 4]);
		}
		other => panic!("expected a fixed value, got {other:?}"),
	}
	assert_eq!(codec.from_value(&encoded).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn arrays_round_trip_in_order() {
	let codec = Codec::array(Codec::int());
	let encoded = codec.to_value(&vec![1, 3, 2]).unwrap();
	assert_eq!(
		encoded,
		Value::Array(vec![Value::Int(1), Value::Int(3), Value::Int(2)])
	);
	assert_eq!(codec.from_value(&encoded).unwrap(), vec![1, 3, 2]);
}

#[test]
fn hash_sets_deduplicate_on_decode() {
	let codec = Codec::hash_set(Codec::int());
	let decoded = codec
		.from_value(&Value::Array(vec![
			Value::Int(1),
			Value::Int(1),
			Value::Int(2),
		]))
		.unwrap();
	assert_eq!(decoded, HashSet::from([1, 2]));
}

#[test]
fn btree_sets_encode_in_ascending_order() {
	let codec = Codec::btree_set(Codec::int());
	let encoded = codec.to_value(&BTreeSet::from([3, 1, 2])).unwrap();
	assert_eq!(
		encoded,
		Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
	);
	assert_eq!(
		codec.from_value(&encoded).unwrap(),
		BTreeSet::from([1, 2, 3])
	);
}

#[test]
fn non_empty_collections_reject_empty_arrays() {
	let array = Codec::non_empty_array(Codec::int());
	assert!(matches!(
		array.from_value(&Value::Array(Vec::new())).unwrap_err(),
		Error::DecodeEmptyCollection { .. }
	));
	assert_eq!(
		array
			.from_value(&Value::Array(vec![Value::Int(1)]))
			.unwrap(),
		vec![1]
	);

	let set = Codec::non_empty_btree_set(Codec::int());
	assert!(matches!(
		set.from_value(&Value::Array(Vec::new())).unwrap_err(),
		Error::DecodeEmptyCollection { .. }
	));
}

#[test]
fn maps_round_trip() {
	let codec = Codec::map(Codec::long());
	let encoded = codec
		.to_value(&HashMap::from([("a".to_owned(), 1i64), ("b".to_owned(), 3)]))
		.unwrap();
	assert_eq!(
		encoded,
		Value::Map(BTreeMap::from([
			("a".to_owned(), Value::Long(1)),
			("b".to_owned(), Value::Long(3)),
		]))
	);
	assert_eq!(
		codec.from_value(&encoded).unwrap(),
		HashMap::from([("a".to_owned(), 1), ("b".to_owned(), 3)])
	);
}

#[test]
fn options_encode_as_null_or_value() {
	let codec = Codec::option(Codec::int());
	assert_eq!(codec.to_value(&None).unwrap(), Value::Null);
	assert_eq!(codec.from_value(&Value::Null).unwrap(), None);
	assert_eq!(codec.to_value(&Some(42)).unwrap(), Value::Int(42));
	assert_eq!(codec.from_value(&Value::Int(42)).unwrap(), Some(42));
}

#[test]
fn uuids_round_trip_as_strings() {
	let codec = Codec::uuid();
	let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
	let encoded = codec.to_value(&id).unwrap();
	assert_eq!(encoded, Value::String(id.to_string()));
	assert_eq!(codec.from_value(&encoded).unwrap(), id);
}

#[test]
fn instants_round_trip_at_millisecond_precision() {
	let codec = Codec::instant();
	let instant = Utc
		.timestamp_millis_opt(1_234_567_890_123)
		.single()
		.unwrap();
	let encoded = codec.to_value(&instant).unwrap();
	assert_eq!(encoded, Value::Long(1_234_567_890_123));
	assert_eq!(codec.from_value(&encoded).unwrap(), instant);
}

#[test]
fn dates_round_trip_as_epoch_days() {
	let codec = Codec::local_date();
	let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
	assert_eq!(codec.to_value(&date).unwrap(), Value::Int(1));

	let date = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
	assert_eq!(codec.to_value(&date).unwrap(), Value::Int(-1));

	let date = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
	let encoded = codec.to_value(&date).unwrap();
	assert_eq!(codec.from_value(&encoded).unwrap(), date);
}

#[test]
fn decimals_round_trip_at_matching_scale() {
	let codec = Codec::decimal(7, 2);
	let value = Decimal::new(123_456, 2);
	let encoded = codec.to_value(&value).unwrap();
	assert_eq!(encoded, Value::Bytes(vec![0x01, 0xE2, 0x40]));
	assert_eq!(codec.from_value(&encoded).unwrap(), value);

	let negative = Decimal::new(-123_456, 2);
	let encoded = codec.to_value(&negative).unwrap();
	assert_eq!(codec.from_value(&encoded).unwrap(), negative);
}

#[test]
fn imap_round_trips_through_the_wrapper_type() {
	#[derive(Debug, Clone, PartialEq)]
	struct Meters(i32);

	let codec = Codec::int().imap(Meters, |meters: &Meters| meters.0);
	let encoded = codec.to_value(&Meters(7)).unwrap();
	assert_eq!(encoded, Value::Int(7));
	assert_eq!(codec.from_value(&encoded).unwrap(), Meters(7));
}
