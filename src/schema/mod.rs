//! Construct, navigate, parse and render Avro [`Schema`]s

mod parsing;
mod serialize;

use std::{fmt, sync::Arc};

use crate::value::Value;

/// Any error that may happen while constructing or parsing a [`Schema`]
///
/// These are the failures the Avro runtime raises when it rejects an
/// argument (invalid names, malformed unions, ...). Codecs surface them as
/// [`Error::Schema`](crate::Error::Schema).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
	#[error("invalid schema JSON: {0}")]
	Json(String),
	#[error("invalid name `{0}`")]
	InvalidName(String),
	#[error("invalid namespace `{0}`")]
	InvalidNamespace(String),
	#[error("unknown type `{0}`")]
	UnknownType(String),
	#[error("schema is missing required attribute `{0}`")]
	MissingAttribute(&'static str),
	#[error("unions must not directly contain another union")]
	NestedUnion,
	#[error("unions cannot contain duplicate {0} schemas")]
	DuplicateInUnion(String),
	#[error("unions must have at least one member schema")]
	EmptyUnion,
	#[error("duplicate field name `{0}` in record schema")]
	DuplicateField(String),
	#[error("invalid symbol `{0}`")]
	InvalidSymbol(String),
	#[error("duplicate symbol `{0}` in enum schema")]
	DuplicateSymbol(String),
	#[error("enum default `{0}` is not part of the symbols")]
	InvalidEnumDefault(String),
	#[error("decimal precision {precision} must be positive and no less than scale {scale}")]
	InvalidDecimal { precision: u32, scale: u32 },
	#[error("invalid default value: {0}")]
	InvalidDefault(String),
	#[error("unknown field order `{0}`")]
	UnknownOrder(String),
	#[error("record value has {given} fields, schema expects {expected}")]
	RecordValueShape { expected: usize, given: usize },
}

impl From<serde_json::Error> for SchemaError {
	fn from(json_error: serde_json::Error) -> Self {
		Self::Json(json_error.to_string())
	}
}

/// The top-level type of a [`Schema`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
	Null,
	Boolean,
	Int,
	Long,
	Float,
	Double,
	Bytes,
	String,
	Fixed,
	Enum,
	Array,
	Map,
	Union,
	Record,
}

impl SchemaKind {
	pub fn as_str(self) -> &'static str {
		match self {
			SchemaKind::Null => "null",
			SchemaKind::Boolean => "boolean",
			SchemaKind::Int => "int",
			SchemaKind::Long => "long",
			SchemaKind::Float => "float",
			SchemaKind::Double => "double",
			SchemaKind::Bytes => "bytes",
			SchemaKind::String => "string",
			SchemaKind::Fixed => "fixed",
			SchemaKind::Enum => "enum",
			SchemaKind::Array => "array",
			SchemaKind::Map => "map",
			SchemaKind::Union => "union",
			SchemaKind::Record => "record",
		}
	}
}

impl fmt::Display for SchemaKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Logical type refining the interpretation of the underlying schema
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalType {
	Decimal { precision: u32, scale: u32 },
	Uuid,
	Date,
	TimestampMillis,
}

impl LogicalType {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogicalType::Decimal { .. } => "decimal",
			LogicalType::Uuid => "uuid",
			LogicalType::Date => "date",
			LogicalType::TimestampMillis => "timestamp-millis",
		}
	}
}

/// Schema component for named variants of a [`Schema`]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name {
	fully_qualified_name: String,
	namespace_delimiter_idx: Option<usize>,
}

impl Name {
	/// Build a name from a possibly dotted string: the last dot separates the
	/// namespace from the name.
	pub fn new(name: &str) -> Result<Self, SchemaError> {
		match name.rsplit_once('.') {
			Some((namespace, name)) => Self::qualified(name, Some(namespace)),
			None => Self::qualified(name, None),
		}
	}

	/// Build a name from its parts
	///
	/// A dotted `name` overrides `namespace`, per the Avro specification.
	pub fn qualified(name: &str, namespace: Option<&str>) -> Result<Self, SchemaError> {
		if let Some((namespace, name)) = name.rsplit_once('.') {
			return Self::qualified(name, Some(namespace));
		}
		if !is_identifier(name) {
			return Err(SchemaError::InvalidName(name.to_owned()));
		}
		match namespace {
			None | Some("") => Ok(Self {
				fully_qualified_name: name.to_owned(),
				namespace_delimiter_idx: None,
			}),
			Some(namespace) => {
				if !namespace.split('.').all(is_identifier) {
					return Err(SchemaError::InvalidNamespace(namespace.to_owned()));
				}
				Ok(Self {
					fully_qualified_name: format!("{namespace}.{name}"),
					namespace_delimiter_idx: Some(namespace.len()),
				})
			}
		}
	}

	pub fn name(&self) -> &str {
		match self.namespace_delimiter_idx {
			None => &self.fully_qualified_name,
			Some(delimiter_idx) => &self.fully_qualified_name[delimiter_idx + 1..],
		}
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace_delimiter_idx
			.map(|idx| &self.fully_qualified_name[..idx])
	}

	pub fn fully_qualified_name(&self) -> &str {
		&self.fully_qualified_name
	}
}

impl fmt::Debug for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.fully_qualified_name, f)
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.fully_qualified_name)
	}
}

fn is_identifier(segment: &str) -> bool {
	let mut chars = segment.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}

/// Sort order of a record field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FieldOrder {
	#[default]
	Ascending,
	Descending,
	Ignore,
}

impl FieldOrder {
	pub fn as_str(self) -> &'static str {
		match self {
			FieldOrder::Ascending => "ascending",
			FieldOrder::Descending => "descending",
			FieldOrder::Ignore => "ignore",
		}
	}
}

/// One field of a record [`Schema`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
	name: String,
	doc: Option<String>,
	default: Option<Value>,
	order: FieldOrder,
	aliases: Vec<String>,
	props: Vec<(String, String)>,
	schema: Schema,
	position: usize,
}

impl RecordField {
	pub fn new(name: &str, schema: Schema) -> Result<Self, SchemaError> {
		if !is_identifier(name) {
			return Err(SchemaError::InvalidName(name.to_owned()));
		}
		Ok(Self {
			name: name.to_owned(),
			doc: None,
			default: None,
			order: FieldOrder::Ascending,
			aliases: Vec::new(),
			props: Vec::new(),
			schema,
			position: 0,
		})
	}

	pub fn with_doc(mut self, doc: Option<String>) -> Self {
		self.doc = doc;
		self
	}

	/// Set the field default
	///
	/// `Some(Value::Null)` and `None` are distinct: only the former renders a
	/// `"default": null` attribute.
	pub fn with_default(mut self, default: Option<Value>) -> Self {
		self.default = default;
		self
	}

	pub fn with_order(mut self, order: FieldOrder) -> Self {
		self.order = order;
		self
	}

	pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
		self.aliases = aliases;
		self
	}

	pub fn with_props(mut self, props: Vec<(String, String)>) -> Self {
		self.props = props;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn doc(&self) -> Option<&str> {
		self.doc.as_deref()
	}

	pub fn default(&self) -> Option<&Value> {
		self.default.as_ref()
	}

	pub fn order(&self) -> FieldOrder {
		self.order
	}

	pub fn aliases(&self) -> &[String] {
		&self.aliases
	}

	pub fn props(&self) -> &[(String, String)] {
		&self.props
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// Position of the field in its record schema
	pub fn position(&self) -> usize {
		self.position
	}
}

/// An Avro schema
///
/// Immutable once constructed and cheap to clone (the tree is shared).
/// Structural equality; [`Display`](fmt::Display) renders the schema JSON and
/// [`FromStr`](std::str::FromStr) parses it back.
#[derive(Clone, PartialEq)]
pub struct Schema {
	pub(crate) inner: Arc<SchemaInner>,
}

#[derive(PartialEq)]
pub(crate) struct SchemaInner {
	pub(crate) type_: SchemaType,
	pub(crate) logical_type: Option<LogicalType>,
}

#[derive(PartialEq)]
pub(crate) enum SchemaType {
	Null,
	Boolean,
	Int,
	Long,
	Float,
	Double,
	Bytes,
	String,
	Array {
		items: Schema,
	},
	Map {
		values: Schema,
	},
	Union {
		variants: Vec<Schema>,
	},
	Fixed {
		name: Name,
		size: usize,
		aliases: Vec<String>,
	},
	Enum {
		name: Name,
		symbols: Vec<String>,
		doc: Option<String>,
		aliases: Vec<String>,
		default: Option<String>,
	},
	Record {
		name: Name,
		doc: Option<String>,
		aliases: Vec<String>,
		props: Vec<(String, String)>,
		fields: Vec<RecordField>,
	},
}

impl Schema {
	fn from_type(type_: SchemaType) -> Self {
		Self {
			inner: Arc::new(SchemaInner {
				type_,
				logical_type: None,
			}),
		}
	}

	pub(crate) fn with_logical_type(type_: SchemaType, logical_type: LogicalType) -> Self {
		Self {
			inner: Arc::new(SchemaInner {
				type_,
				logical_type: Some(logical_type),
			}),
		}
	}

	pub fn null() -> Self {
		Self::from_type(SchemaType::Null)
	}

	pub fn boolean() -> Self {
		Self::from_type(SchemaType::Boolean)
	}

	pub fn int() -> Self {
		Self::from_type(SchemaType::Int)
	}

	pub fn long() -> Self {
		Self::from_type(SchemaType::Long)
	}

	pub fn float() -> Self {
		Self::from_type(SchemaType::Float)
	}

	pub fn double() -> Self {
		Self::from_type(SchemaType::Double)
	}

	pub fn bytes() -> Self {
		Self::from_type(SchemaType::Bytes)
	}

	pub fn string() -> Self {
		Self::from_type(SchemaType::String)
	}

	pub fn array(items: Schema) -> Self {
		Self::from_type(SchemaType::Array { items })
	}

	pub fn map(values: Schema) -> Self {
		Self::from_type(SchemaType::Map { values })
	}

	pub fn fixed(name: Name, size: usize) -> Self {
		Self::from_type(SchemaType::Fixed {
			name,
			size,
			aliases: Vec::new(),
		})
	}

	pub(crate) fn fixed_parts(name: Name, size: usize, aliases: Vec<String>) -> Self {
		Self::from_type(SchemaType::Fixed {
			name,
			size,
			aliases,
		})
	}

	/// A `string` schema tagged with the `uuid` logical type
	pub fn uuid() -> Self {
		Self::with_logical_type(SchemaType::String, LogicalType::Uuid)
	}

	/// An `int` schema tagged with the `date` logical type (days since epoch)
	pub fn date() -> Self {
		Self::with_logical_type(SchemaType::Int, LogicalType::Date)
	}

	/// A `long` schema tagged with the `timestamp-millis` logical type
	pub fn timestamp_millis() -> Self {
		Self::with_logical_type(SchemaType::Long, LogicalType::TimestampMillis)
	}

	/// A `bytes` schema tagged with the `decimal` logical type
	pub fn decimal(precision: u32, scale: u32) -> Result<Self, SchemaError> {
		if precision == 0 || scale > precision {
			return Err(SchemaError::InvalidDecimal { precision, scale });
		}
		Ok(Self::with_logical_type(
			SchemaType::Bytes,
			LogicalType::Decimal { precision, scale },
		))
	}

	/// A union of the given member schemas, in order
	///
	/// Rejects immediate nested unions and duplicate members (same unnamed
	/// kind, or same full name for named members).
	pub fn union(variants: Vec<Schema>) -> Result<Self, SchemaError> {
		if variants.is_empty() {
			return Err(SchemaError::EmptyUnion);
		}
		for (idx, variant) in variants.iter().enumerate() {
			if variant.kind() == SchemaKind::Union {
				return Err(SchemaError::NestedUnion);
			}
			for other in &variants[..idx] {
				let duplicate = match (variant.full_name(), other.full_name()) {
					(Some(a), Some(b)) => a == b,
					(None, None) => variant.kind() == other.kind(),
					_ => false,
				};
				if duplicate {
					let label = match variant.full_name() {
						Some(name) => name.to_owned(),
						None => variant.kind().to_string(),
					};
					return Err(SchemaError::DuplicateInUnion(label));
				}
			}
		}
		Ok(Self::from_type(SchemaType::Union { variants }))
	}

	/// An enum schema with the given symbols and optional default symbol
	pub fn enumeration(
		name: Name,
		symbols: Vec<String>,
		doc: Option<String>,
		aliases: Vec<String>,
		default: Option<String>,
	) -> Result<Self, SchemaError> {
		for (idx, symbol) in symbols.iter().enumerate() {
			if !is_identifier(symbol) {
				return Err(SchemaError::InvalidSymbol(symbol.clone()));
			}
			if symbols[..idx].contains(symbol) {
				return Err(SchemaError::DuplicateSymbol(symbol.clone()));
			}
		}
		if let Some(default) = &default {
			if !symbols.contains(default) {
				return Err(SchemaError::InvalidEnumDefault(default.clone()));
			}
		}
		Ok(Self::from_type(SchemaType::Enum {
			name,
			symbols,
			doc,
			aliases,
			default,
		}))
	}

	/// A record schema; field positions are assigned in declaration order
	pub fn record(
		name: Name,
		doc: Option<String>,
		aliases: Vec<String>,
		props: Vec<(String, String)>,
		mut fields: Vec<RecordField>,
	) -> Result<Self, SchemaError> {
		for (position, field) in fields.iter_mut().enumerate() {
			field.position = position;
		}
		for (idx, field) in fields.iter().enumerate() {
			if fields[..idx].iter().any(|other| other.name == field.name) {
				return Err(SchemaError::DuplicateField(field.name.clone()));
			}
		}
		Ok(Self::from_type(SchemaType::Record {
			name,
			doc,
			aliases,
			props,
			fields,
		}))
	}

	pub fn kind(&self) -> SchemaKind {
		match &self.inner.type_ {
			SchemaType::Null => SchemaKind::Null,
			SchemaType::Boolean => SchemaKind::Boolean,
			SchemaType::Int => SchemaKind::Int,
			SchemaType::Long => SchemaKind::Long,
			SchemaType::Float => SchemaKind::Float,
			SchemaType::Double => SchemaKind::Double,
			SchemaType::Bytes => SchemaKind::Bytes,
			SchemaType::String => SchemaKind::String,
			SchemaType::Array { .. } => SchemaKind::Array,
			SchemaType::Map { .. } => SchemaKind::Map,
			SchemaType::Union { .. } => SchemaKind::Union,
			SchemaType::Fixed { .. } => SchemaKind::Fixed,
			SchemaType::Enum { .. } => SchemaKind::Enum,
			SchemaType::Record { .. } => SchemaKind::Record,
		}
	}

	pub fn logical_type(&self) -> Option<&LogicalType> {
		self.inner.logical_type.as_ref()
	}

	/// Element schema of an array or map
	pub fn element_type(&self) -> Option<&Schema> {
		match &self.inner.type_ {
			SchemaType::Array { items } => Some(items),
			SchemaType::Map { values } => Some(values),
			_ => None,
		}
	}

	/// Member schemas of a union, in declaration order
	pub fn variants(&self) -> Option<&[Schema]> {
		match &self.inner.type_ {
			SchemaType::Union { variants } => Some(variants),
			_ => None,
		}
	}

	/// Name of a named schema (record, enum, fixed)
	pub fn name(&self) -> Option<&Name> {
		match &self.inner.type_ {
			SchemaType::Fixed { name, .. }
			| SchemaType::Enum { name, .. }
			| SchemaType::Record { name, .. } => Some(name),
			_ => None,
		}
	}

	pub fn full_name(&self) -> Option<&str> {
		self.name().map(Name::fully_qualified_name)
	}

	/// Ordered field list of a record schema
	pub fn fields(&self) -> Option<&[RecordField]> {
		match &self.inner.type_ {
			SchemaType::Record { fields, .. } => Some(fields),
			_ => None,
		}
	}

	/// Look up a record field by name
	pub fn field(&self, name: &str) -> Option<&RecordField> {
		self.fields()?.iter().find(|field| field.name == name)
	}

	/// Symbols of an enum schema
	pub fn symbols(&self) -> Option<&[String]> {
		match &self.inner.type_ {
			SchemaType::Enum { symbols, .. } => Some(symbols),
			_ => None,
		}
	}

	/// Default symbol of an enum schema
	pub fn enum_default(&self) -> Option<&str> {
		match &self.inner.type_ {
			SchemaType::Enum { default, .. } => default.as_deref(),
			_ => None,
		}
	}

	/// Size of a fixed schema
	pub fn size(&self) -> Option<usize> {
		match &self.inner.type_ {
			SchemaType::Fixed { size, .. } => Some(*size),
			_ => None,
		}
	}
}
