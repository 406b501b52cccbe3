use {
	avro_typed::{
		codec::Enumeration,
		schema::SchemaError,
		value::EnumSymbol,
		Codec, Error, Schema, Value,
	},
	pretty_assertions::assert_eq,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Suit {
	Clubs,
	Diamonds,
	Hearts,
	Spades,
}

impl Suit {
	fn symbol(&self) -> String {
		match self {
			Suit::Clubs => "clubs",
			Suit::Diamonds => "diamonds",
			Suit::Hearts => "hearts",
			Suit::Spades => "spades",
		}
		.to_owned()
	}

	fn from_symbol(symbol: &str) -> Result<Self, Error> {
		match symbol {
			"clubs" => Ok(Suit::Clubs),
			"diamonds" => Ok(Suit::Diamonds),
			"hearts" => Ok(Suit::Hearts),
			"spades" => Ok(Suit::Spades),
			other => Err(Error::Message(format!("unknown suit {other}"))),
		}
	}
}

const SYMBOLS: [&str; 4] = ["clubs", "diamonds", "hearts", "spades"];

fn suit_codec() -> Codec<Suit> {
	Codec::enumeration("club.Suit", &SYMBOLS, |suit: &Suit| suit.symbol(), Suit::from_symbol)
}

#[test]
fn enum_schemas_render_their_symbols() {
	assert_eq!(
		suit_codec().schema().unwrap().to_string(),
		r#"{"type":"enum","name":"Suit","namespace":"club","symbols":["clubs","diamonds","hearts","spades"]}"#
	);
}

#[test]
fn enums_round_trip() {
	let codec = suit_codec();
	let encoded = codec.to_value(&Suit::Hearts).unwrap();
	match &encoded {
		Value::Enum(symbol) => assert_eq!(symbol.symbol(), "hearts"),
		other => panic!("expected an enum value, got {other:?}"),
	}
	assert_eq!(codec.from_value(&encoded).unwrap(), Suit::Hearts);
}

#[test]
fn default_values_become_the_schema_default_symbol() {
	let codec = Enumeration::new("Suit", SYMBOLS)
		.namespace("club")
		.default_value(Suit::Spades)
		.codec(|suit: &Suit| suit.symbol(), Suit::from_symbol);
	assert_eq!(
		codec.schema().unwrap().to_string(),
		r#"{"type":"enum","name":"Suit","namespace":"club","symbols":["clubs","diamonds","hearts","spades"],"default":"spades"}"#
	);
}

#[test]
fn encoding_respects_the_supplied_schema_symbols() {
	let narrowed: Schema =
		r#"{"type":"enum","name":"Suit","namespace":"club","symbols":["clubs","spades"]}"#
			.parse()
			.unwrap();
	let error = suit_codec().encode(&Suit::Hearts, &narrowed).unwrap_err();
	assert!(matches!(error, Error::EncodeSymbolNotInSchema { .. }));
	assert!(error
		.to_string()
		.starts_with("symbol hearts is not part of schema symbols [clubs, spades]"));
}

#[test]
fn enum_codecs_verify_the_schema_name() {
	let rank: Schema =
		r#"{"type":"enum","name":"Rank","namespace":"club","symbols":["clubs","spades"]}"#
			.parse()
			.unwrap();
	assert_eq!(
		suit_codec()
			.encode(&Suit::Clubs, &rank)
			.unwrap_err()
			.to_string(),
		"unable to encode club.Suit using schema with name club.Rank since names do not match"
	);
	assert_eq!(
		suit_codec()
			.decode(&Value::Enum(EnumSymbol::new(rank.clone(), "clubs".to_owned())), &rank)
			.unwrap_err()
			.to_string(),
		"unable to decode club.Suit using schema with name club.Rank since names do not match"
	);
}

#[test]
fn decoding_rejects_symbols_outside_the_schema() {
	let codec = suit_codec();
	let schema = codec.schema().unwrap().clone();
	let error = codec
		.from_value(&Value::Enum(EnumSymbol::new(schema, "ninja".to_owned())))
		.unwrap_err();
	assert!(matches!(error, Error::DecodeSymbolNotInSchema { .. }));
}

#[test]
fn invalid_symbols_surface_as_schema_errors() {
	let codec = Enumeration::new("Suit", ["not a symbol"])
		.codec(|suit: &Suit| suit.symbol(), Suit::from_symbol);
	assert_eq!(
		codec.schema().unwrap_err(),
		Error::Schema(SchemaError::InvalidSymbol("not a symbol".to_owned()))
	);
}
