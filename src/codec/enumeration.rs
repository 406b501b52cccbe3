//! The enum codec: named symbol sets with default-symbol handling

use std::any::type_name;

use super::Codec;
use crate::{
	error::Error,
	schema::{Name, Schema, SchemaKind},
	value::{EnumSymbol, Value, ValueKind},
};

/// Builder for an enum codec over symbol type `A`
pub struct Enumeration<A> {
	name: String,
	namespace: Option<String>,
	doc: Option<String>,
	aliases: Vec<String>,
	symbols: Vec<String>,
	default: Option<A>,
}

impl<A: 'static> Enumeration<A> {
	pub fn new<S: Into<String>>(name: &str, symbols: impl IntoIterator<Item = S>) -> Self {
		Self {
			name: name.to_owned(),
			namespace: None,
			doc: None,
			aliases: Vec::new(),
			symbols: symbols.into_iter().map(Into::into).collect(),
			default: None,
		}
	}

	pub fn namespace(mut self, namespace: &str) -> Self {
		self.namespace = Some(namespace.to_owned());
		self
	}

	pub fn doc(mut self, doc: &str) -> Self {
		self.doc = Some(doc.to_owned());
		self
	}

	pub fn alias(mut self, alias: &str) -> Self {
		self.aliases.push(alias.to_owned());
		self
	}

	/// Value whose symbol becomes the schema's default symbol
	pub fn default_value(mut self, default: A) -> Self {
		self.default = Some(default);
		self
	}

	/// Finish the build given conversions between `A` and symbol strings
	pub fn codec(
		self,
		encode: impl Fn(&A) -> String + Send + Sync + 'static,
		decode: impl Fn(&str) -> Result<A, Error> + Send + Sync + 'static,
	) -> Codec<A> {
		let type_label = type_name::<A>();
		let type_name_full = match Name::qualified(&self.name, self.namespace.as_deref()) {
			Ok(name) => name.fully_qualified_name().to_owned(),
			Err(_) => self.name.clone(),
		};
		let default_symbol = self.default.as_ref().map(&encode);
		let schema = (|| -> Result<Schema, Error> {
			let name = Name::qualified(&self.name, self.namespace.as_deref())?;
			Schema::enumeration(
				name,
				self.symbols.clone(),
				self.doc.clone(),
				self.aliases.clone(),
				default_symbol,
			)
			.map_err(Error::from)
		})();
		let encode_name = type_name_full.clone();
		let decode_name = type_name_full;
		Codec::new(
			schema,
			move |value: &A, schema: &Schema| {
				if schema.kind() != SchemaKind::Enum {
					return Err(Error::encode_schema_mismatch(
						&encode_name,
						schema,
						&[SchemaKind::Enum],
					));
				}
				match schema.full_name() {
					Some(name) if name == encode_name => {}
					other => {
						return Err(Error::EncodeNameMismatch {
							schema_name: other.unwrap_or_default().to_owned(),
							expected: encode_name.clone(),
						})
					}
				}
				// The supplied schema's symbols are authoritative, not the
				// symbols this codec was built with
				let symbol = encode(value);
				let symbols = schema.symbols().unwrap_or(&[]);
				if !symbols.contains(&symbol) {
					return Err(Error::EncodeSymbolNotInSchema {
						symbol,
						symbols: symbols.to_vec(),
						type_label: type_label.to_owned(),
					});
				}
				Ok(Value::Enum(EnumSymbol::new(schema.clone(), symbol)))
			},
			move |value: &Value, schema: &Schema| {
				if schema.kind() != SchemaKind::Enum {
					return Err(Error::decode_schema_mismatch(
						&decode_name,
						schema,
						&[SchemaKind::Enum],
					));
				}
				match schema.full_name() {
					Some(name) if name == decode_name => {}
					other => {
						return Err(Error::DecodeNameMismatch {
							schema_name: other.unwrap_or_default().to_owned(),
							expected: decode_name.clone(),
						})
					}
				}
				match value {
					Value::Enum(enum_value) => {
						let symbols = schema.symbols().unwrap_or(&[]);
						if !symbols.iter().any(|s| s == enum_value.symbol()) {
							return Err(Error::DecodeSymbolNotInSchema {
								symbol: enum_value.symbol().to_owned(),
								symbols: symbols.to_vec(),
								type_label: type_label.to_owned(),
							});
						}
						decode(enum_value.symbol())
					}
					other => Err(Error::decode_type_mismatch(
						&decode_name,
						ValueKind::Enum,
						other,
					)),
				}
			},
		)
	}
}

impl<A: 'static> Codec<A> {
	/// Codec for an enum named `name` (possibly dotted) with the given
	/// symbols
	///
	/// See [`Enumeration`] for the fully-optioned builder.
	pub fn enumeration(
		name: &str,
		symbols: &[&str],
		encode: impl Fn(&A) -> String + Send + Sync + 'static,
		decode: impl Fn(&str) -> Result<A, Error> + Send + Sync + 'static,
	) -> Self {
		Enumeration::new(name, symbols.iter().copied()).codec(encode, decode)
	}
}
