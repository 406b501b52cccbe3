//! # Getting started
//!
//! ```
//! use avro_typed::Codec;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Test {
//! 	field: String,
//! }
//!
//! let codec: Codec<Test> = Codec::record("Test")
//! 	.namespace("test")
//! 	.build(|b| {
//! 		let field = b.field("field", Codec::string(), |test: &Test| test.field.clone());
//! 		b.finish(move |row| {
//! 			Ok(Test {
//! 				field: row.get(&field)?,
//! 			})
//! 		})
//! 	});
//!
//! let value = Test {
//! 	field: "foo".to_owned(),
//! };
//! let encoded = codec.to_value(&value).expect("failed to encode");
//! assert_eq!(codec.from_value(&encoded).expect("failed to decode"), value);
//! ```
//!
//! # Typed, composable Avro codecs
//!
//! A [`Codec<A>`](Codec) carries, for a user type `A`, a [`Schema`], an
//! encoder into the runtime [`Value`] representation and a decoder back to
//! `A`. Both directions are checked at runtime against the schema the caller
//! supplies, with a structured [`Error`] for every failure class.
//!
//! Built-in codecs cover the scalar, temporal, identifier, byte-string and
//! collection types. [`Codec::record`], [`Codec::union`] and
//! [`Codec::enumeration`] compile declarative descriptions of user types
//! into codecs, and [`Codec::imap`] adapts an existing codec to a wrapper
//! type.
//!
//! Binary wire encoding is out of scope: codecs produce and consume the
//! generic [`Value`] tree, and schemas render to and parse from Avro schema
//! JSON.

pub mod codec;
pub mod schema;
pub mod value;

mod error;

pub use {codec::Codec, error::Error, schema::Schema, value::Value};
