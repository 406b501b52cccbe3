//! Codecs for containers: arrays, sets, maps and options

use std::{
	any::type_name,
	collections::{BTreeMap, BTreeSet, HashMap, HashSet},
	hash::Hash,
};

use super::Codec;
use crate::{
	error::Error,
	schema::{Schema, SchemaKind},
	value::{Value, ValueKind},
};

impl<A: 'static> Codec<Vec<A>> {
	/// Codec for an Avro array, delegating elements to `element`
	///
	/// Encoded ordering is the `Vec`'s order.
	pub fn array(element: Codec<A>) -> Self {
		let schema = element.schema().map(|s| Schema::array(s.clone()));
		let decode_element = element.clone();
		Self::new(
			schema,
			move |items: &Vec<A>, schema| {
				let element_schema = array_schema_encode(schema, type_name::<Vec<A>>())?;
				items
					.iter()
					.map(|item| element.encode(item, element_schema))
					.collect::<Result<Vec<_>, _>>()
					.map(Value::Array)
			},
			move |value, schema| {
				let element_schema = array_schema_decode(schema, type_name::<Vec<A>>())?;
				match value {
					Value::Array(items) => items
						.iter()
						.map(|item| decode_element.decode(item, element_schema))
						.collect(),
					other => Err(Error::decode_type_mismatch(
						type_name::<Vec<A>>(),
						ValueKind::Array,
						other,
					)),
				}
			},
		)
	}

	/// Like [`array`](Self::array), but decoding rejects empty arrays
	pub fn non_empty_array(element: Codec<A>) -> Self
	where
		A: Clone,
	{
		Codec::array(element).imap_error(
			|items| {
				if items.is_empty() {
					Err(Error::DecodeEmptyCollection {
						type_label: type_name::<Vec<A>>().to_owned(),
					})
				} else {
					Ok(items)
				}
			},
			|items| items.clone(),
		)
	}
}

impl<A: Eq + Hash + 'static> Codec<HashSet<A>> {
	/// Codec for a set written as an Avro array
	///
	/// Encoded ordering is the set's iteration order; decoding deduplicates.
	pub fn hash_set(element: Codec<A>) -> Self {
		let schema = element.schema().map(|s| Schema::array(s.clone()));
		let decode_element = element.clone();
		Self::new(
			schema,
			move |items: &HashSet<A>, schema| {
				let element_schema = array_schema_encode(schema, type_name::<HashSet<A>>())?;
				items
					.iter()
					.map(|item| element.encode(item, element_schema))
					.collect::<Result<Vec<_>, _>>()
					.map(Value::Array)
			},
			move |value, schema| {
				let element_schema = array_schema_decode(schema, type_name::<HashSet<A>>())?;
				match value {
					Value::Array(items) => items
						.iter()
						.map(|item| decode_element.decode(item, element_schema))
						.collect(),
					other => Err(Error::decode_type_mismatch(
						type_name::<HashSet<A>>(),
						ValueKind::Array,
						other,
					)),
				}
			},
		)
	}
}

impl<A: Ord + 'static> Codec<BTreeSet<A>> {
	/// Codec for a sorted set written as an Avro array
	///
	/// Encoded ordering is ascending by the element's total order; decoding
	/// deduplicates.
	pub fn btree_set(element: Codec<A>) -> Self {
		let schema = element.schema().map(|s| Schema::array(s.clone()));
		let decode_element = element.clone();
		Self::new(
			schema,
			move |items: &BTreeSet<A>, schema| {
				let element_schema = array_schema_encode(schema, type_name::<BTreeSet<A>>())?;
				items
					.iter()
					.map(|item| element.encode(item, element_schema))
					.collect::<Result<Vec<_>, _>>()
					.map(Value::Array)
			},
			move |value, schema| {
				let element_schema = array_schema_decode(schema, type_name::<BTreeSet<A>>())?;
				match value {
					Value::Array(items) => items
						.iter()
						.map(|item| decode_element.decode(item, element_schema))
						.collect(),
					other => Err(Error::decode_type_mismatch(
						type_name::<BTreeSet<A>>(),
						ValueKind::Array,
						other,
					)),
				}
			},
		)
	}

	/// Like [`btree_set`](Self::btree_set), but decoding rejects empty arrays
	pub fn non_empty_btree_set(element: Codec<A>) -> Self
	where
		A: Clone,
	{
		Codec::btree_set(element).imap_error(
			|items| {
				if items.is_empty() {
					Err(Error::DecodeEmptyCollection {
						type_label: type_name::<BTreeSet<A>>().to_owned(),
					})
				} else {
					Ok(items)
				}
			},
			|items| items.clone(),
		)
	}
}

impl<A: 'static> Codec<HashMap<String, A>> {
	/// Codec for an Avro map, delegating entry values to `values`
	pub fn map(values: Codec<A>) -> Self {
		let schema = values.schema().map(|s| Schema::map(s.clone()));
		let decode_values = values.clone();
		Self::new(
			schema,
			move |entries: &HashMap<String, A>, schema| {
				let value_schema = map_schema_encode(schema, type_name::<HashMap<String, A>>())?;
				entries
					.iter()
					.map(|(key, value)| Ok((key.clone(), values.encode(value, value_schema)?)))
					.collect::<Result<BTreeMap<_, _>, Error>>()
					.map(Value::Map)
			},
			move |value, schema| {
				let value_schema = map_schema_decode(schema, type_name::<HashMap<String, A>>())?;
				match value {
					Value::Map(entries) => entries
						.iter()
						.map(|(key, value)| {
							Ok((key.clone(), decode_values.decode(value, value_schema)?))
						})
						.collect::<Result<HashMap<_, _>, Error>>(),
					other => Err(Error::decode_type_mismatch(
						type_name::<HashMap<String, A>>(),
						ValueKind::Map,
						other,
					)),
				}
			},
		)
	}
}

impl<A: 'static> Codec<Option<A>> {
	/// Codec for an optional value, written as `union(null, inner)`
	///
	/// Accepts any two-branch union containing `null` in either position;
	/// any other union shape is rejected.
	pub fn option(inner: Codec<A>) -> Self {
		let schema = inner
			.schema()
			.and_then(|s| Schema::union(vec![Schema::null(), s.clone()]).map_err(Error::from));
		let decode_inner = inner.clone();
		Self::new(
			schema,
			move |value: &Option<A>, schema| {
				let some_schema = option_branch(schema).ok_or_else(|| {
					Error::EncodeUnexpectedOptionSchema {
						schema: schema.clone(),
					}
				})?;
				match value {
					None => Ok(Value::Null),
					Some(value) => inner.encode(value, some_schema),
				}
			},
			move |value, schema| {
				let some_schema = option_branch(schema).ok_or_else(|| {
					Error::DecodeUnexpectedOptionSchema {
						schema: schema.clone(),
					}
				})?;
				match value {
					Value::Null => Ok(None),
					other => decode_inner.decode(other, some_schema).map(Some),
				}
			},
		)
	}
}

/// The non-null branch of a two-branch union containing `null`
fn option_branch(schema: &Schema) -> Option<&Schema> {
	match schema.variants()? {
		[first, second] if first.kind() == SchemaKind::Null => Some(second),
		[first, second] if second.kind() == SchemaKind::Null => Some(first),
		_ => None,
	}
}

fn array_schema_encode<'s>(schema: &'s Schema, type_label: &str) -> Result<&'s Schema, Error> {
	match (schema.kind(), schema.element_type()) {
		(SchemaKind::Array, Some(element_schema)) => Ok(element_schema),
		_ => Err(Error::encode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Array],
		)),
	}
}

fn array_schema_decode<'s>(schema: &'s Schema, type_label: &str) -> Result<&'s Schema, Error> {
	match (schema.kind(), schema.element_type()) {
		(SchemaKind::Array, Some(element_schema)) => Ok(element_schema),
		_ => Err(Error::decode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Array],
		)),
	}
}

fn map_schema_encode<'s>(schema: &'s Schema, type_label: &str) -> Result<&'s Schema, Error> {
	match (schema.kind(), schema.element_type()) {
		(SchemaKind::Map, Some(value_schema)) => Ok(value_schema),
		_ => Err(Error::encode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Map],
		)),
	}
}

fn map_schema_decode<'s>(schema: &'s Schema, type_label: &str) -> Result<&'s Schema, Error> {
	match (schema.kind(), schema.element_type()) {
		(SchemaKind::Map, Some(value_schema)) => Ok(value_schema),
		_ => Err(Error::decode_schema_mismatch(
			type_label,
			schema,
			&[SchemaKind::Map],
		)),
	}
}
