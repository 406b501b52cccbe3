//! The runtime representation of Avro data that codecs produce and consume

use std::{collections::BTreeMap, fmt};

use crate::schema::{Schema, SchemaError, SchemaKind};

/// Runtime tag of a [`Value`], used in error messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
	Null,
	Boolean,
	Int,
	Long,
	Float,
	Double,
	Bytes,
	String,
	Array,
	Map,
	Record,
	Enum,
	Fixed,
}

impl ValueKind {
	pub fn as_str(self) -> &'static str {
		match self {
			ValueKind::Null => "null",
			ValueKind::Boolean => "boolean",
			ValueKind::Int => "int",
			ValueKind::Long => "long",
			ValueKind::Float => "float",
			ValueKind::Double => "double",
			ValueKind::Bytes => "bytes",
			ValueKind::String => "string",
			ValueKind::Array => "array",
			ValueKind::Map => "map",
			ValueKind::Record => "record",
			ValueKind::Enum => "enum",
			ValueKind::Fixed => "fixed",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Any Avro value
///
/// Union values are not wrapped: a value encoded against a union schema is
/// simply the value of the selected branch.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Null,
	Boolean(bool),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Bytes(Vec<u8>),
	String(String),
	Array(Vec<Value>),
	Map(BTreeMap<String, Value>),
	Record(Record),
	Enum(EnumSymbol),
	Fixed(Fixed),
}

impl Value {
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Null => ValueKind::Null,
			Value::Boolean(_) => ValueKind::Boolean,
			Value::Int(_) => ValueKind::Int,
			Value::Long(_) => ValueKind::Long,
			Value::Float(_) => ValueKind::Float,
			Value::Double(_) => ValueKind::Double,
			Value::Bytes(_) => ValueKind::Bytes,
			Value::String(_) => ValueKind::String,
			Value::Array(_) => ValueKind::Array,
			Value::Map(_) => ValueKind::Map,
			Value::Record(_) => ValueKind::Record,
			Value::Enum(_) => ValueKind::Enum,
			Value::Fixed(_) => ValueKind::Fixed,
		}
	}

	/// Schema carried by a named container value (record, enum, fixed)
	pub fn schema(&self) -> Option<&Schema> {
		match self {
			Value::Record(record) => Some(record.schema()),
			Value::Enum(symbol) => Some(symbol.schema()),
			Value::Fixed(fixed) => Some(fixed.schema()),
			_ => None,
		}
	}

	/// Render the value as schema-default JSON (bytes and fixed become
	/// latin-1 strings, per the Avro specification)
	pub(crate) fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Boolean(value) => serde_json::Value::Bool(*value),
			Value::Int(value) => serde_json::Value::Number((*value).into()),
			Value::Long(value) => serde_json::Value::Number((*value).into()),
			Value::Float(value) => float_to_json(f64::from(*value)),
			Value::Double(value) => float_to_json(*value),
			Value::Bytes(bytes) => serde_json::Value::String(latin1(bytes)),
			Value::String(value) => serde_json::Value::String(value.clone()),
			Value::Array(items) => {
				serde_json::Value::Array(items.iter().map(Value::to_json).collect())
			}
			Value::Map(entries) => serde_json::Value::Object(
				entries
					.iter()
					.map(|(key, value)| (key.clone(), value.to_json()))
					.collect(),
			),
			Value::Record(record) => {
				let fields = record.schema().fields().unwrap_or(&[]);
				serde_json::Value::Object(
					fields
						.iter()
						.zip(&record.values)
						.map(|(field, value)| (field.name().to_owned(), value.to_json()))
						.collect(),
				)
			}
			Value::Enum(symbol) => serde_json::Value::String(symbol.symbol().to_owned()),
			Value::Fixed(fixed) => serde_json::Value::String(latin1(fixed.bytes())),
		}
	}

	/// Parse a schema-default JSON value against the given schema
	///
	/// Defaults for union fields are interpreted against the first branch,
	/// per the Avro specification.
	pub(crate) fn from_json(
		json: &serde_json::Value,
		schema: &Schema,
	) -> Result<Value, SchemaError> {
		let invalid = || {
			SchemaError::InvalidDefault(format!(
				"{json} is not a valid default for schema type {}",
				schema.kind()
			))
		};
		match schema.kind() {
			SchemaKind::Null => match json {
				serde_json::Value::Null => Ok(Value::Null),
				_ => Err(invalid()),
			},
			SchemaKind::Boolean => match json {
				serde_json::Value::Bool(value) => Ok(Value::Boolean(*value)),
				_ => Err(invalid()),
			},
			SchemaKind::Int => match json.as_i64() {
				Some(value) => i32::try_from(value).map(Value::Int).map_err(|_| invalid()),
				None => Err(invalid()),
			},
			SchemaKind::Long => json.as_i64().map(Value::Long).ok_or_else(&invalid),
			SchemaKind::Float => json
				.as_f64()
				.map(|value| Value::Float(value as f32))
				.ok_or_else(&invalid),
			SchemaKind::Double => json.as_f64().map(Value::Double).ok_or_else(&invalid),
			SchemaKind::Bytes => match json.as_str() {
				Some(value) => Ok(Value::Bytes(from_latin1(value).ok_or_else(&invalid)?)),
				None => Err(invalid()),
			},
			SchemaKind::String => json
				.as_str()
				.map(|value| Value::String(value.to_owned()))
				.ok_or_else(&invalid),
			SchemaKind::Fixed => {
				let bytes = json
					.as_str()
					.and_then(from_latin1)
					.ok_or_else(&invalid)?;
				if Some(bytes.len()) != schema.size() {
					return Err(invalid());
				}
				Ok(Value::Fixed(Fixed::new(schema.clone(), bytes)))
			}
			SchemaKind::Enum => {
				let symbol = json.as_str().ok_or_else(&invalid)?;
				if !schema
					.symbols()
					.is_some_and(|symbols| symbols.iter().any(|s| s == symbol))
				{
					return Err(invalid());
				}
				Ok(Value::Enum(EnumSymbol::new(schema.clone(), symbol.to_owned())))
			}
			SchemaKind::Array => {
				let (items, element_schema) = match (json.as_array(), schema.element_type()) {
					(Some(items), Some(element_schema)) => (items, element_schema),
					_ => return Err(invalid()),
				};
				items
					.iter()
					.map(|item| Value::from_json(item, element_schema))
					.collect::<Result<_, _>>()
					.map(Value::Array)
			}
			SchemaKind::Map => {
				let (entries, value_schema) = match (json.as_object(), schema.element_type()) {
					(Some(entries), Some(value_schema)) => (entries, value_schema),
					_ => return Err(invalid()),
				};
				entries
					.iter()
					.map(|(key, value)| {
						Ok((key.clone(), Value::from_json(value, value_schema)?))
					})
					.collect::<Result<_, SchemaError>>()
					.map(Value::Map)
			}
			SchemaKind::Union => {
				let first = schema
					.variants()
					.and_then(|variants| variants.first())
					.ok_or_else(&invalid)?;
				Value::from_json(json, first)
			}
			SchemaKind::Record => {
				let (entries, fields) = match (json.as_object(), schema.fields()) {
					(Some(entries), Some(fields)) => (entries, fields),
					_ => return Err(invalid()),
				};
				let values = fields
					.iter()
					.map(|field| match entries.get(field.name()) {
						Some(value) => Value::from_json(value, field.schema()),
						None => field.default().cloned().ok_or_else(&invalid),
					})
					.collect::<Result<_, _>>()?;
				Ok(Value::Record(Record {
					schema: schema.clone(),
					values,
				}))
			}
		}
	}
}

fn float_to_json(value: f64) -> serde_json::Value {
	match serde_json::Number::from_f64(value) {
		Some(number) => serde_json::Value::Number(number),
		None => serde_json::Value::Null,
	}
}

fn latin1(bytes: &[u8]) -> String {
	bytes.iter().map(|&b| char::from(b)).collect()
}

fn from_latin1(s: &str) -> Option<Vec<u8>> {
	s.chars()
		.map(|c| u8::try_from(u32::from(c)).ok())
		.collect()
}

/// A generic record value: its schema plus one value per field, positionally
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
	schema: Schema,
	values: Vec<Value>,
}

impl Record {
	/// Pair a record schema with positional field values
	///
	/// There must be exactly one value per schema field.
	pub fn new(schema: Schema, values: Vec<Value>) -> Result<Self, SchemaError> {
		let expected = schema.fields().map_or(0, |fields| fields.len());
		if values.len() != expected {
			return Err(SchemaError::RecordValueShape {
				expected,
				given: values.len(),
			});
		}
		Ok(Self { schema, values })
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn get(&self, position: usize) -> Option<&Value> {
		self.values.get(position)
	}

	/// Look up a field value by schema field name
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.values.get(self.schema.field(name)?.position())
	}
}

/// A generic enum value: its schema plus the selected symbol
#[derive(Clone, Debug, PartialEq)]
pub struct EnumSymbol {
	schema: Schema,
	symbol: String,
}

impl EnumSymbol {
	pub fn new(schema: Schema, symbol: String) -> Self {
		Self { schema, symbol }
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn symbol(&self) -> &str {
		&self.symbol
	}
}

/// A generic fixed value: its schema plus the raw bytes
#[derive(Clone, Debug, PartialEq)]
pub struct Fixed {
	schema: Schema,
	bytes: Vec<u8>,
}

impl Fixed {
	pub fn new(schema: Schema, bytes: Vec<u8>) -> Self {
		Self { schema, bytes }
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}
}
