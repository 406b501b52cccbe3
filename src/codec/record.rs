//! The record codec and its declarative field program

use std::{marker::PhantomData, sync::Arc};

use super::Codec;
use crate::{
	error::Error,
	schema::{self, FieldOrder, Name, Schema, SchemaKind},
	value::{Record, Value, ValueKind},
};

/// Description of one record field of enclosing type `A` with payload `B`
///
/// Built with [`Field::new`] and refined with the builder methods, then
/// declared on a [`FieldProgram`] via
/// [`field_with`](FieldProgram::field_with).
pub struct Field<A, B> {
	name: String,
	access: Box<dyn Fn(&A) -> B + Send + Sync>,
	codec: Codec<B>,
	doc: Option<String>,
	default: Option<B>,
	order: FieldOrder,
	aliases: Vec<String>,
	props: Vec<(String, String)>,
}

impl<A, B> Field<A, B> {
	pub fn new(
		name: &str,
		codec: Codec<B>,
		access: impl Fn(&A) -> B + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.to_owned(),
			access: Box::new(access),
			codec,
			doc: None,
			default: None,
			order: FieldOrder::Ascending,
			aliases: Vec::new(),
			props: Vec::new(),
		}
	}

	pub fn doc(mut self, doc: &str) -> Self {
		self.doc = Some(doc.to_owned());
		self
	}

	/// Default used when decoding a record whose schema lacks this field
	///
	/// The default is also encoded into the record schema.
	pub fn default(mut self, default: B) -> Self {
		self.default = Some(default);
		self
	}

	pub fn order(mut self, order: FieldOrder) -> Self {
		self.order = order;
		self
	}

	/// Former name of this field, also consulted when looking the field up
	/// in an incoming record
	pub fn alias(mut self, alias: &str) -> Self {
		self.aliases.push(alias.to_owned());
		self
	}

	pub fn prop(mut self, key: &str, value: &str) -> Self {
		self.props.push((key.to_owned(), value.to_owned()));
		self
	}
}

trait ErasedField<A>: Send + Sync {
	fn schema_field(&self) -> Result<schema::RecordField, Error>;
	fn encode(
		&self,
		value: &A,
		record_schema: &Schema,
		type_label: &str,
	) -> Result<(usize, Value), Error>;
}

impl<A, B: Clone + Send + Sync + 'static> ErasedField<A> for Arc<Field<A, B>> {
	fn schema_field(&self) -> Result<schema::RecordField, Error> {
		let field_schema = self.codec.schema()?.clone();
		let default = match &self.default {
			Some(default) => Some(self.codec.encode(default, &field_schema)?),
			None => None,
		};
		Ok(schema::RecordField::new(&self.name, field_schema)?
			.with_doc(self.doc.clone())
			.with_default(default)
			.with_order(self.order)
			.with_aliases(self.aliases.clone())
			.with_props(self.props.clone()))
	}

	fn encode(
		&self,
		value: &A,
		record_schema: &Schema,
		type_label: &str,
	) -> Result<(usize, Value), Error> {
		match record_schema.field(&self.name) {
			Some(schema_field) => {
				let encoded = self
					.codec
					.encode(&(self.access)(value), schema_field.schema())?;
				Ok((schema_field.position(), encoded))
			}
			None => Err(Error::EncodeMissingRecordField {
				field: self.name.clone(),
				type_label: type_label.to_owned(),
			}),
		}
	}
}

/// Typed handle to a declared field, used to read its decoded value out of a
/// [`RecordRow`]
pub struct FieldRef<A, B> {
	inner: Arc<Field<A, B>>,
}

impl<A, B> Clone for FieldRef<A, B> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

/// The ordered field declarations of a record codec under construction
///
/// Fields jointly describe the record schema and the encode plan; reading
/// each declared field back out of a [`RecordRow`] is the decode plan,
/// declared last via [`finish`](Self::finish).
pub struct FieldProgram<A> {
	fields: Vec<Box<dyn ErasedField<A>>>,
}

/// The fold half of a field program: rebuilds an `A` from a [`RecordRow`]
pub struct Recombinator<A> {
	make: Arc<dyn Fn(&RecordRow<'_>) -> Result<A, Error> + Send + Sync>,
}

impl<A: 'static> FieldProgram<A> {
	/// Declare a field with just a name, codec and accessor
	pub fn field<B>(
		&mut self,
		name: &str,
		codec: Codec<B>,
		access: impl Fn(&A) -> B + Send + Sync + 'static,
	) -> FieldRef<A, B>
	where
		B: Clone + Send + Sync + 'static,
	{
		self.field_with(Field::new(name, codec, access))
	}

	/// Declare a fully-specified field
	pub fn field_with<B>(&mut self, field: Field<A, B>) -> FieldRef<A, B>
	where
		B: Clone + Send + Sync + 'static,
	{
		let inner = Arc::new(field);
		self.fields.push(Box::new(Arc::clone(&inner)));
		FieldRef { inner }
	}

	/// Close the program with the closure rebuilding `A` from the declared
	/// fields of an incoming record
	pub fn finish(
		&self,
		make: impl Fn(&RecordRow<'_>) -> Result<A, Error> + Send + Sync + 'static,
	) -> Recombinator<A> {
		Recombinator {
			make: Arc::new(make),
		}
	}
}

/// One incoming record, read field by field
///
/// Lookup is by name (then by the field's aliases), never by position, so
/// records whose fields were reordered decode the same.
pub struct RecordRow<'a> {
	record: &'a Record,
	type_label: &'a str,
}

impl RecordRow<'_> {
	/// Read the declared field out of the incoming record
	///
	/// If the incoming record's schema lacks the field under its name and
	/// all aliases, the field's declared default is used instead.
	pub fn get<A, B: Clone + 'static>(&self, field: &FieldRef<A, B>) -> Result<B, Error> {
		let field = &*field.inner;
		let writer_schema = self.record.schema();
		let schema_field = writer_schema.field(&field.name).or_else(|| {
			field
				.aliases
				.iter()
				.find_map(|alias| writer_schema.field(alias))
		});
		match schema_field {
			Some(schema_field) => {
				let value = self.record.get(schema_field.position()).ok_or_else(|| {
					Error::DecodeMissingRecordField {
						field: field.name.clone(),
						type_label: self.type_label.to_owned(),
					}
				})?;
				field.codec.decode(value, schema_field.schema())
			}
			None => match &field.default {
				Some(default) => Ok(default.clone()),
				None => Err(Error::DecodeMissingRecordField {
					field: field.name.clone(),
					type_label: self.type_label.to_owned(),
				}),
			},
		}
	}
}

/// Builder for a record codec
///
/// Set the record attributes, then [`build`](Self::build) with a closure
/// that declares the fields and returns the recombinator producing `A` from
/// a [`RecordRow`].
pub struct RecordBuilder<A> {
	name: String,
	namespace: Option<String>,
	doc: Option<String>,
	aliases: Vec<String>,
	props: Vec<(String, String)>,
	marker: PhantomData<fn() -> A>,
}

impl<A: 'static> RecordBuilder<A> {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_owned(),
			namespace: None,
			doc: None,
			aliases: Vec::new(),
			props: Vec::new(),
			marker: PhantomData,
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

	pub fn prop(mut self, key: &str, value: &str) -> Self {
		self.props.push((key.to_owned(), value.to_owned()));
		self
	}

	pub fn build<F>(self, program: F) -> Codec<A>
	where
		F: FnOnce(&mut FieldProgram<A>) -> Recombinator<A>,
	{
		let mut declared = FieldProgram { fields: Vec::new() };
		let recombinator = program(&mut declared);
		let fields = declared.fields;
		// Name applies the dotted-name-overrides-namespace rule
		let type_name = match Name::qualified(&self.name, self.namespace.as_deref()) {
			Ok(name) => name.fully_qualified_name().to_owned(),
			Err(_) => self.name.clone(),
		};
		let schema = (|| -> Result<Schema, Error> {
			let name = Name::qualified(&self.name, self.namespace.as_deref())?;
			let schema_fields = fields
				.iter()
				.map(|field| field.schema_field())
				.collect::<Result<Vec<_>, Error>>()?;
			Schema::record(
				name,
				self.doc.clone(),
				self.aliases.clone(),
				self.props.clone(),
				schema_fields,
			)
			.map_err(Error::from)
		})();
		let encode_label = type_name.clone();
		let decode_label = type_name;
		Codec::new(
			schema,
			move |value: &A, schema: &Schema| {
				if schema.kind() != SchemaKind::Record {
					return Err(Error::encode_schema_mismatch(
						&encode_label,
						schema,
						&[SchemaKind::Record],
					));
				}
				match schema.full_name() {
					Some(name) if name == encode_label => {}
					other => {
						return Err(Error::EncodeNameMismatch {
							schema_name: other.unwrap_or_default().to_owned(),
							expected: encode_label.clone(),
						})
					}
				}
				// Schema fields not declared by the program stay null
				let mut values =
					vec![Value::Null; schema.fields().map_or(0, |fields| fields.len())];
				for field in &fields {
					let (position, encoded) = field.encode(value, schema, &encode_label)?;
					values[position] = encoded;
				}
				Record::new(schema.clone(), values)
					.map(Value::Record)
					.map_err(Error::from)
			},
			move |value: &Value, schema: &Schema| {
				if schema.kind() != SchemaKind::Record {
					return Err(Error::decode_schema_mismatch(
						&decode_label,
						schema,
						&[SchemaKind::Record],
					));
				}
				match value {
					Value::Record(record) => {
						match record.schema().full_name() {
							Some(name) if name == decode_label => {}
							other => {
								return Err(Error::DecodeUnexpectedRecordName {
									actual: other.unwrap_or_default().to_owned(),
									expected: decode_label.clone(),
								})
							}
						}
						(recombinator.make)(&RecordRow {
							record,
							type_label: &decode_label,
						})
					}
					other => Err(Error::decode_type_mismatch(
						&decode_label,
						ValueKind::Record,
						other,
					)),
				}
			},
		)
	}
}

impl<A: 'static> Codec<A> {
	/// Start building a record codec named `name`
	///
	/// See [`RecordBuilder`].
	pub fn record(name: &str) -> RecordBuilder<A> {
		RecordBuilder::new(name)
	}
}
