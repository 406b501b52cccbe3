use std::{cell::RefCell, collections::HashSet, fmt};

use serde::ser::*;

use super::{FieldOrder, LogicalType, RecordField, Schema, SchemaType};

impl fmt::Display for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let seen = RefCell::new(HashSet::new());
		match serde_json::to_string(&SerializeSchema {
			schema: self,
			seen: &seen,
		}) {
			Ok(json) => f.write_str(&json),
			Err(_) => Err(fmt::Error),
		}
	}
}

impl fmt::Debug for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

/// Serializes a schema node, rendering a named type that was already written
/// as a reference to its full name
struct SerializeSchema<'a> {
	schema: &'a Schema,
	seen: &'a RefCell<HashSet<String>>,
}

impl<'a> SerializeSchema<'a> {
	fn nested(&self, schema: &'a Schema) -> SerializeSchema<'a> {
		SerializeSchema {
			schema,
			seen: self.seen,
		}
	}

	fn serialize_logical<S: SerializeMap>(
		&self,
		map: &mut S,
	) -> Result<(), S::Error> {
		if let Some(logical_type) = &self.schema.inner.logical_type {
			map.serialize_entry("logicalType", logical_type.as_str())?;
			if let LogicalType::Decimal { precision, scale } = logical_type {
				map.serialize_entry("precision", precision)?;
				map.serialize_entry("scale", scale)?;
			}
		}
		Ok(())
	}
}

impl Serialize for SerializeSchema<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match &self.schema.inner.type_ {
			SchemaType::Null
			| SchemaType::Boolean
			| SchemaType::Int
			| SchemaType::Long
			| SchemaType::Float
			| SchemaType::Double
			| SchemaType::Bytes
			| SchemaType::String => {
				let type_name = self.schema.kind().as_str();
				if self.schema.inner.logical_type.is_none() {
					serializer.serialize_str(type_name)
				} else {
					let mut map = serializer.serialize_map(None)?;
					map.serialize_entry("type", type_name)?;
					self.serialize_logical(&mut map)?;
					map.end()
				}
			}
			SchemaType::Array { items } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("type", "array")?;
				map.serialize_entry("items", &self.nested(items))?;
				map.end()
			}
			SchemaType::Map { values } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("type", "map")?;
				map.serialize_entry("values", &self.nested(values))?;
				map.end()
			}
			SchemaType::Union { variants } => {
				let mut seq = serializer.serialize_seq(Some(variants.len()))?;
				for variant in variants {
					seq.serialize_element(&self.nested(variant))?;
				}
				seq.end()
			}
			SchemaType::Fixed {
				name,
				size,
				aliases,
			} => {
				if !self.seen.borrow_mut().insert(name.fully_qualified_name().to_owned()) {
					return serializer.serialize_str(name.fully_qualified_name());
				}
				let mut map = serializer.serialize_map(None)?;
				map.serialize_entry("type", "fixed")?;
				map.serialize_entry("name", name.name())?;
				if let Some(namespace) = name.namespace() {
					map.serialize_entry("namespace", namespace)?;
				}
				if !aliases.is_empty() {
					map.serialize_entry("aliases", aliases)?;
				}
				map.serialize_entry("size", size)?;
				self.serialize_logical(&mut map)?;
				map.end()
			}
			SchemaType::Enum {
				name,
				symbols,
				doc,
				aliases,
				default,
			} => {
				if !self.seen.borrow_mut().insert(name.fully_qualified_name().to_owned()) {
					return serializer.serialize_str(name.fully_qualified_name());
				}
				let mut map = serializer.serialize_map(None)?;
				map.serialize_entry("type", "enum")?;
				map.serialize_entry("name", name.name())?;
				if let Some(namespace) = name.namespace() {
					map.serialize_entry("namespace", namespace)?;
				}
				if let Some(doc) = doc {
					map.serialize_entry("doc", doc)?;
				}
				if !aliases.is_empty() {
					map.serialize_entry("aliases", aliases)?;
				}
				map.serialize_entry("symbols", symbols)?;
				if let Some(default) = default {
					map.serialize_entry("default", default)?;
				}
				map.end()
			}
			SchemaType::Record {
				name,
				doc,
				aliases,
				props,
				fields,
			} => {
				if !self.seen.borrow_mut().insert(name.fully_qualified_name().to_owned()) {
					return serializer.serialize_str(name.fully_qualified_name());
				}
				let mut map = serializer.serialize_map(None)?;
				map.serialize_entry("type", "record")?;
				map.serialize_entry("name", name.name())?;
				if let Some(namespace) = name.namespace() {
					map.serialize_entry("namespace", namespace)?;
				}
				if let Some(doc) = doc {
					map.serialize_entry("doc", doc)?;
				}
				if !aliases.is_empty() {
					map.serialize_entry("aliases", aliases)?;
				}
				map.serialize_entry("fields", &SerializeFields {
					fields,
					seen: self.seen,
				})?;
				for (key, value) in props {
					map.serialize_entry(key, value)?;
				}
				map.end()
			}
		}
	}
}

struct SerializeFields<'a> {
	fields: &'a [RecordField],
	seen: &'a RefCell<HashSet<String>>,
}

impl Serialize for SerializeFields<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.fields.len()))?;
		for field in self.fields {
			seq.serialize_element(&SerializeField {
				field,
				seen: self.seen,
			})?;
		}
		seq.end()
	}
}

struct SerializeField<'a> {
	field: &'a RecordField,
	seen: &'a RefCell<HashSet<String>>,
}

impl Serialize for SerializeField<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("name", self.field.name())?;
		if let Some(doc) = self.field.doc() {
			map.serialize_entry("doc", doc)?;
		}
		if !self.field.aliases().is_empty() {
			map.serialize_entry("aliases", self.field.aliases())?;
		}
		map.serialize_entry("type", &SerializeSchema {
			schema: self.field.schema(),
			seen: self.seen,
		})?;
		if let Some(default) = self.field.default() {
			map.serialize_entry("default", &default.to_json())?;
		}
		if self.field.order() != FieldOrder::Ascending {
			map.serialize_entry("order", self.field.order().as_str())?;
		}
		for (key, value) in self.field.props() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl Schema {
	/// Render the schema in parsing canonical form: full names, normalized
	/// attribute order, everything irrelevant to reading (docs, aliases,
	/// defaults, logical types, custom properties) stripped.
	pub fn canonical_form(&self) -> String {
		let mut out = String::new();
		write_canonical(self, &mut out, &mut HashSet::new());
		out
	}
}

fn write_canonical(schema: &Schema, out: &mut String, seen: &mut HashSet<String>) {
	match &schema.inner.type_ {
		SchemaType::Null
		| SchemaType::Boolean
		| SchemaType::Int
		| SchemaType::Long
		| SchemaType::Float
		| SchemaType::Double
		| SchemaType::Bytes
		| SchemaType::String => {
			out.push('"');
			out.push_str(schema.kind().as_str());
			out.push('"');
		}
		SchemaType::Array { items } => {
			out.push_str("{\"type\":\"array\",\"items\":");
			write_canonical(items, out, seen);
			out.push('}');
		}
		SchemaType::Map { values } => {
			out.push_str("{\"type\":\"map\",\"values\":");
			write_canonical(values, out, seen);
			out.push('}');
		}
		SchemaType::Union { variants } => {
			out.push('[');
			for (idx, variant) in variants.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				write_canonical(variant, out, seen);
			}
			out.push(']');
		}
		SchemaType::Fixed { name, size, .. } => {
			if !seen.insert(name.fully_qualified_name().to_owned()) {
				out.push('"');
				out.push_str(name.fully_qualified_name());
				out.push('"');
				return;
			}
			out.push_str("{\"name\":\"");
			out.push_str(name.fully_qualified_name());
			out.push_str("\",\"type\":\"fixed\",\"size\":");
			out.push_str(&size.to_string());
			out.push('}');
		}
		SchemaType::Enum { name, symbols, .. } => {
			if !seen.insert(name.fully_qualified_name().to_owned()) {
				out.push('"');
				out.push_str(name.fully_qualified_name());
				out.push('"');
				return;
			}
			out.push_str("{\"name\":\"");
			out.push_str(name.fully_qualified_name());
			out.push_str("\",\"type\":\"enum\",\"symbols\":[");
			for (idx, symbol) in symbols.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				out.push('"');
				out.push_str(symbol);
				out.push('"');
			}
			out.push_str("]}");
		}
		SchemaType::Record { name, fields, .. } => {
			if !seen.insert(name.fully_qualified_name().to_owned()) {
				out.push('"');
				out.push_str(name.fully_qualified_name());
				out.push('"');
				return;
			}
			out.push_str("{\"name\":\"");
			out.push_str(name.fully_qualified_name());
			out.push_str("\",\"type\":\"record\",\"fields\":[");
			for (idx, field) in fields.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				out.push_str("{\"name\":\"");
				out.push_str(field.name());
				out.push_str("\",\"type\":");
				write_canonical(field.schema(), out, seen);
				out.push('}');
			}
			out.push_str("]}");
		}
	}
}
