//! The union codec: alternatives, prisms and declaration-order selection

use std::{any::type_name, sync::Arc};

use super::Codec;
use crate::{
	error::Error,
	schema::{Schema, SchemaKind},
	value::Value,
};

/// A partial focus on one branch of a sum type
///
/// Lawful pairs satisfy `get_option(reverse_get(b)) == Some(b)`, and when
/// `get_option(a) == Some(b)` then `reverse_get(b) == a`.
pub struct Prism<A, B> {
	get_option: Arc<dyn Fn(&A) -> Option<B> + Send + Sync>,
	reverse_get: Arc<dyn Fn(B) -> A + Send + Sync>,
}

impl<A, B> Prism<A, B> {
	pub fn new(
		get_option: impl Fn(&A) -> Option<B> + Send + Sync + 'static,
		reverse_get: impl Fn(B) -> A + Send + Sync + 'static,
	) -> Self {
		Self {
			get_option: Arc::new(get_option),
			reverse_get: Arc::new(reverse_get),
		}
	}

	/// Project the branch payload out of `value`, if this is the focused
	/// branch
	pub fn get_option(&self, value: &A) -> Option<B> {
		(self.get_option)(value)
	}

	/// Inject the branch payload back into the sum type
	pub fn reverse_get(&self, value: B) -> A {
		(self.reverse_get)(value)
	}
}

impl<A, B> Clone for Prism<A, B> {
	fn clone(&self) -> Self {
		Self {
			get_option: Arc::clone(&self.get_option),
			reverse_get: Arc::clone(&self.reverse_get),
		}
	}
}

trait AltOps<A>: Send + Sync {
	fn schema(&self) -> Result<Schema, Error>;
	fn full_name(&self) -> Option<String>;
	fn encode(
		&self,
		value: &A,
		variants: &[Schema],
		type_label: &str,
	) -> Option<Result<Value, Error>>;
	fn try_decode(&self, value: &Value, member: &Schema) -> Result<A, Error>;
}

/// One branch of a union codec; the payload type is erased behind [`AltOps`]
struct Alternative<A, B> {
	codec: Codec<B>,
	prism: Prism<A, B>,
}

impl<A, B: 'static> AltOps<A> for Alternative<A, B> {
	fn schema(&self) -> Result<Schema, Error> {
		self.codec.schema().map(Clone::clone)
	}

	fn full_name(&self) -> Option<String> {
		self.codec
			.schema()
			.ok()
			.and_then(|schema| schema.full_name().map(str::to_owned))
	}

	fn encode(
		&self,
		value: &A,
		variants: &[Schema],
		type_label: &str,
	) -> Option<Result<Value, Error>> {
		let inner = self.prism.get_option(value)?;
		Some((|| -> Result<Value, Error> {
			let alt_schema = self.codec.schema()?;
			let member = variants
				.iter()
				.find(|member| member_matches(alt_schema, member))
				.ok_or_else(|| Error::EncodeMissingUnionSchema {
					name: schema_identifier(alt_schema),
					type_label: type_label.to_owned(),
				})?;
			self.codec.encode(&inner, member)
		})())
	}

	fn try_decode(&self, value: &Value, member: &Schema) -> Result<A, Error> {
		self.codec
			.decode(value, member)
			.map(|inner| self.prism.reverse_get(inner))
	}
}

/// Named alternatives match members by full name, unnamed ones by kind
/// (Avro forbids two unnamed members of the same kind in one union)
fn member_matches(alt_schema: &Schema, member: &Schema) -> bool {
	match (alt_schema.full_name(), member.full_name()) {
		(Some(alt_name), Some(member_name)) => alt_name == member_name,
		(None, None) => alt_schema.kind() == member.kind(),
		_ => false,
	}
}

fn schema_identifier(schema: &Schema) -> String {
	match schema.full_name() {
		Some(full_name) => full_name.to_owned(),
		None => schema.kind().to_string(),
	}
}

/// Collects the alternatives of a union codec, in declaration order
pub struct UnionBuilder<A> {
	alts: Vec<Box<dyn AltOps<A>>>,
}

impl<A: 'static> UnionBuilder<A> {
	/// Declare the next alternative
	pub fn alt<B: 'static>(&mut self, codec: Codec<B>, prism: Prism<A, B>) {
		self.alts.push(Box::new(Alternative { codec, prism }));
	}
}

impl<A: 'static> Codec<A> {
	/// Codec for a sum type over the declared alternatives
	///
	/// Encoding selects the first alternative whose prism matches, in
	/// declaration order. Decoding resolves record/enum/fixed values by the
	/// full name their carried schema declares; any other value is tried
	/// against the alternatives positionally and the first success wins.
	pub fn union(build: impl FnOnce(&mut UnionBuilder<A>)) -> Self {
		let mut builder = UnionBuilder { alts: Vec::new() };
		build(&mut builder);
		let alts = Arc::new(builder.alts);
		let type_label = type_name::<A>();
		let schema = (|| -> Result<Schema, Error> {
			let variants = alts
				.iter()
				.map(|alt| alt.schema())
				.collect::<Result<Vec<_>, Error>>()?;
			Schema::union(variants).map_err(Error::from)
		})();
		let decode_alts = Arc::clone(&alts);
		Codec::new(
			schema,
			move |value: &A, schema: &Schema| {
				let variants = schema.variants().ok_or_else(|| {
					Error::encode_schema_mismatch(type_label, schema, &[SchemaKind::Union])
				})?;
				for alt in alts.iter() {
					if let Some(result) = alt.encode(value, variants, type_label) {
						return result;
					}
				}
				Err(Error::EncodeExhaustedAlternatives {
					type_label: type_label.to_owned(),
				})
			},
			move |value: &Value, schema: &Schema| {
				let variants = schema.variants().ok_or_else(|| {
					Error::decode_schema_mismatch(type_label, schema, &[SchemaKind::Union])
				})?;
				match value.schema().and_then(|schema| schema.full_name()) {
					Some(full_name) => {
						let member = variants
							.iter()
							.find(|member| member.full_name() == Some(full_name))
							.ok_or_else(|| Error::DecodeMissingUnionSchema {
								name: full_name.to_owned(),
								type_label: type_label.to_owned(),
							})?;
						let alt = decode_alts
							.iter()
							.find(|alt| alt.full_name().as_deref() == Some(full_name))
							.ok_or_else(|| Error::DecodeMissingUnionAlternative {
								name: full_name.to_owned(),
								type_label: type_label.to_owned(),
							})?;
						alt.try_decode(value, member)
					}
					None => {
						for (alt, member) in decode_alts.iter().zip(variants) {
							if let Ok(decoded) = alt.try_decode(value, member) {
								return Ok(decoded);
							}
						}
						Err(Error::DecodeExhaustedAlternatives {
							actual: value.kind(),
							type_label: type_label.to_owned(),
						})
					}
				}
			},
		)
	}
}
