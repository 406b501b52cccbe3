//! The [`Codec`] abstraction, its combinators and the built-in codecs

mod collection;
mod enumeration;
mod logical;
mod primitive;
mod record;
mod union;

pub use {
	enumeration::Enumeration,
	record::{Field, FieldProgram, FieldRef, Recombinator, RecordBuilder, RecordRow},
	union::{Prism, UnionBuilder},
};

use std::{fmt, sync::Arc};

use crate::{error::Error, schema::Schema, value::Value};

type EncodeFn<A> = dyn Fn(&A, &Schema) -> Result<Value, Error> + Send + Sync;
type DecodeFn<A> = dyn Fn(&Value, &Schema) -> Result<A, Error> + Send + Sync;

/// A typed Avro codec: a schema plus an encoder to and a decoder from the
/// runtime [`Value`] representation
///
/// Codecs are immutable and cheap to clone; clones share the schema and the
/// encode/decode plans. The schema is computed once, at construction.
pub struct Codec<A> {
	schema: Result<Schema, Error>,
	encode: Arc<EncodeFn<A>>,
	decode: Arc<DecodeFn<A>>,
}

impl<A> Clone for Codec<A> {
	fn clone(&self) -> Self {
		Self {
			schema: self.schema.clone(),
			encode: Arc::clone(&self.encode),
			decode: Arc::clone(&self.decode),
		}
	}
}

impl<A: 'static> Codec<A> {
	/// Build a codec from its parts
	///
	/// The encoder must produce a value fitting the supplied schema; the
	/// decoder must parse a value interpreted as the supplied schema. Both
	/// are expected to verify the schema they are handed rather than assume
	/// it equals `schema`.
	pub fn new(
		schema: Result<Schema, Error>,
		encode: impl Fn(&A, &Schema) -> Result<Value, Error> + Send + Sync + 'static,
		decode: impl Fn(&Value, &Schema) -> Result<A, Error> + Send + Sync + 'static,
	) -> Self {
		Self {
			schema,
			encode: Arc::new(encode),
			decode: Arc::new(decode),
		}
	}

	/// The schema this codec writes with, or the error that occurred while
	/// deriving it
	pub fn schema(&self) -> Result<&Schema, Error> {
		self.schema.as_ref().map_err(Clone::clone)
	}

	/// Encode a value so that it fits the supplied schema
	pub fn encode(&self, value: &A, schema: &Schema) -> Result<Value, Error> {
		(self.encode)(value, schema)
	}

	/// Decode a runtime value interpreted as the supplied schema
	pub fn decode(&self, value: &Value, schema: &Schema) -> Result<A, Error> {
		(self.decode)(value, schema)
	}

	/// Encode using the codec's own schema
	pub fn to_value(&self, value: &A) -> Result<Value, Error> {
		let schema = self.schema()?;
		(self.encode)(value, schema)
	}

	/// Decode using the codec's own schema
	pub fn from_value(&self, value: &Value) -> Result<A, Error> {
		let schema = self.schema()?;
		(self.decode)(value, schema)
	}

	/// Turn a `Codec<A>` into a `Codec<B>` given conversions both ways
	///
	/// The schema is unchanged: `B` is encoded by converting back to `A`,
	/// and decoded `A`s are converted forward with `f`.
	pub fn imap<B: 'static>(
		self,
		f: impl Fn(A) -> B + Send + Sync + 'static,
		g: impl Fn(&B) -> A + Send + Sync + 'static,
	) -> Codec<B> {
		let encode = self.encode;
		let decode = self.decode;
		Codec {
			schema: self.schema,
			encode: Arc::new(move |value, schema| encode(&g(value), schema)),
			decode: Arc::new(move |value, schema| decode(value, schema).map(&f)),
		}
	}

	/// Like [`imap`](Self::imap), but the forward conversion may fail during
	/// decoding
	pub fn imap_error<B: 'static>(
		self,
		f: impl Fn(A) -> Result<B, Error> + Send + Sync + 'static,
		g: impl Fn(&B) -> A + Send + Sync + 'static,
	) -> Codec<B> {
		let encode = self.encode;
		let decode = self.decode;
		Codec {
			schema: self.schema,
			encode: Arc::new(move |value, schema| encode(&g(value), schema)),
			decode: Arc::new(move |value, schema| decode(value, schema).and_then(&f)),
		}
	}
}

impl<A> fmt::Debug for Codec<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.schema {
			Ok(schema) => write!(f, "Codec({schema})"),
			Err(error) => write!(f, "Codec({error})"),
		}
	}
}
