use std::collections::HashMap;

use super::{FieldOrder, LogicalType, Name, RecordField, Schema, SchemaError, SchemaType};
use crate::value::Value;

impl std::str::FromStr for Schema {
	type Err = SchemaError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let raw: RawSchema = serde_json::from_str(s)?;
		let mut names = HashMap::new();
		raw_to_schema(&raw, None, &mut names)
	}
}

#[derive(serde_derive::Deserialize)]
#[serde(untagged)]
enum RawSchema {
	Name(String),
	Union(Vec<RawSchema>),
	Object(Box<RawObject>),
}

#[derive(serde_derive::Deserialize)]
struct RawObject {
	#[serde(rename = "type")]
	type_: String,
	#[serde(rename = "logicalType")]
	logical_type: Option<String>,
	name: Option<String>,
	namespace: Option<String>,
	doc: Option<String>,
	aliases: Option<Vec<String>>,
	fields: Option<Vec<RawField>>,
	symbols: Option<Vec<String>>,
	items: Option<RawSchema>,
	values: Option<RawSchema>,
	size: Option<usize>,
	precision: Option<u32>,
	scale: Option<u32>,
	default: Option<serde_json::Value>,
}

#[derive(serde_derive::Deserialize)]
struct RawField {
	name: String,
	doc: Option<String>,
	#[serde(rename = "type")]
	type_: RawSchema,
	default: Option<serde_json::Value>,
	order: Option<String>,
	aliases: Option<Vec<String>>,
}

fn raw_to_schema(
	raw: &RawSchema,
	enclosing_namespace: Option<&str>,
	names: &mut HashMap<String, Schema>,
) -> Result<Schema, SchemaError> {
	match raw {
		RawSchema::Name(name) => named_or_primitive(name, enclosing_namespace, names),
		RawSchema::Union(members) => {
			let variants = members
				.iter()
				.map(|member| raw_to_schema(member, enclosing_namespace, names))
				.collect::<Result<Vec<_>, _>>()?;
			Schema::union(variants)
		}
		RawSchema::Object(object) => object_to_schema(object, enclosing_namespace, names),
	}
}

fn primitive_from_name(name: &str) -> Option<Schema> {
	Some(match name {
		"null" => Schema::null(),
		"boolean" => Schema::boolean(),
		"int" => Schema::int(),
		"long" => Schema::long(),
		"float" => Schema::float(),
		"double" => Schema::double(),
		"bytes" => Schema::bytes(),
		"string" => Schema::string(),
		_ => return None,
	})
}

/// A bare string is either a primitive type name or a reference to a named
/// type defined earlier in the document
fn named_or_primitive(
	name: &str,
	enclosing_namespace: Option<&str>,
	names: &HashMap<String, Schema>,
) -> Result<Schema, SchemaError> {
	if let Some(schema) = primitive_from_name(name) {
		return Ok(schema);
	}
	let full_name = match (name.contains('.'), enclosing_namespace) {
		(false, Some(namespace)) => format!("{namespace}.{name}"),
		_ => name.to_owned(),
	};
	names
		.get(&full_name)
		.cloned()
		.ok_or_else(|| SchemaError::UnknownType(name.to_owned()))
}

fn object_to_schema(
	object: &RawObject,
	enclosing_namespace: Option<&str>,
	names: &mut HashMap<String, Schema>,
) -> Result<Schema, SchemaError> {
	match object.type_.as_str() {
		"array" => {
			let items = object
				.items
				.as_ref()
				.ok_or(SchemaError::MissingAttribute("items"))?;
			Ok(Schema::array(raw_to_schema(
				items,
				enclosing_namespace,
				names,
			)?))
		}
		"map" => {
			let values = object
				.values
				.as_ref()
				.ok_or(SchemaError::MissingAttribute("values"))?;
			Ok(Schema::map(raw_to_schema(
				values,
				enclosing_namespace,
				names,
			)?))
		}
		"fixed" => {
			let name = object_name(object, enclosing_namespace)?;
			let size = object.size.ok_or(SchemaError::MissingAttribute("size"))?;
			let aliases = object.aliases.clone().unwrap_or_default();
			let schema = match object.logical_type.as_deref() {
				Some("decimal") => {
					let (precision, scale) = decimal_attributes(object)?;
					Schema::with_logical_type(
						SchemaType::Fixed {
							name: name.clone(),
							size,
							aliases,
						},
						LogicalType::Decimal { precision, scale },
					)
				}
				_ => Schema::fixed_parts(name.clone(), size, aliases),
			};
			names.insert(name.fully_qualified_name().to_owned(), schema.clone());
			Ok(schema)
		}
		"enum" => {
			let name = object_name(object, enclosing_namespace)?;
			let symbols = object
				.symbols
				.clone()
				.ok_or(SchemaError::MissingAttribute("symbols"))?;
			let default = match &object.default {
				Some(serde_json::Value::String(symbol)) => Some(symbol.clone()),
				Some(other) => return Err(SchemaError::InvalidDefault(other.to_string())),
				None => None,
			};
			let schema = Schema::enumeration(
				name.clone(),
				symbols,
				object.doc.clone(),
				object.aliases.clone().unwrap_or_default(),
				default,
			)?;
			names.insert(name.fully_qualified_name().to_owned(), schema.clone());
			Ok(schema)
		}
		"record" => {
			let name = object_name(object, enclosing_namespace)?;
			let raw_fields = object
				.fields
				.as_ref()
				.ok_or(SchemaError::MissingAttribute("fields"))?;
			let mut fields = Vec::with_capacity(raw_fields.len());
			for raw_field in raw_fields {
				let field_schema = raw_to_schema(&raw_field.type_, name.namespace(), names)?;
				let mut field = RecordField::new(&raw_field.name, field_schema)?
					.with_doc(raw_field.doc.clone())
					.with_aliases(raw_field.aliases.clone().unwrap_or_default());
				if let Some(order) = &raw_field.order {
					field = field.with_order(parse_order(order)?);
				}
				if let Some(default) = &raw_field.default {
					let default_value = Value::from_json(default, field.schema())?;
					field = field.with_default(Some(default_value));
				}
				fields.push(field);
			}
			let schema = Schema::record(
				name.clone(),
				object.doc.clone(),
				object.aliases.clone().unwrap_or_default(),
				Vec::new(),
				fields,
			)?;
			names.insert(name.fully_qualified_name().to_owned(), schema.clone());
			Ok(schema)
		}
		other => match primitive_from_name(other) {
			Some(base) => match (other, object.logical_type.as_deref()) {
				("int", Some("date")) => Ok(Schema::date()),
				("long", Some("timestamp-millis")) => Ok(Schema::timestamp_millis()),
				("string", Some("uuid")) => Ok(Schema::uuid()),
				("bytes", Some("decimal")) => {
					let (precision, scale) = decimal_attributes(object)?;
					Schema::decimal(precision, scale)
				}
				// Unknown logical type tags are ignored
				_ => Ok(base),
			},
			None => named_or_primitive(other, enclosing_namespace, names),
		},
	}
}

fn object_name(
	object: &RawObject,
	enclosing_namespace: Option<&str>,
) -> Result<Name, SchemaError> {
	let name = object
		.name
		.as_deref()
		.ok_or(SchemaError::MissingAttribute("name"))?;
	Name::qualified(name, object.namespace.as_deref().or(enclosing_namespace))
}

fn decimal_attributes(object: &RawObject) -> Result<(u32, u32), SchemaError> {
	let precision = object
		.precision
		.ok_or(SchemaError::MissingAttribute("precision"))?;
	let scale = object.scale.unwrap_or(0);
	if precision == 0 || scale > precision {
		return Err(SchemaError::InvalidDecimal { precision, scale });
	}
	Ok((precision, scale))
}

fn parse_order(order: &str) -> Result<FieldOrder, SchemaError> {
	match order {
		"ascending" => Ok(FieldOrder::Ascending),
		"descending" => Ok(FieldOrder::Descending),
		"ignore" => Ok(FieldOrder::Ignore),
		other => Err(SchemaError::UnknownOrder(other.to_owned())),
	}
}
