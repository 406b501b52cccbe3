use {
	avro_typed::{
		codec::Field,
		schema::FieldOrder,
		value::Record,
		Codec, Schema, Value,
	},
	pretty_assertions::assert_eq,
};

#[derive(Debug, Clone, PartialEq)]
struct Foo {
	x: i32,
	y: i32,
}

fn foo_codec() -> Codec<Foo> {
	Codec::record("Foo").namespace("p").build(|b| {
		let x = b.field("x", Codec::int(), |foo: &Foo| foo.x);
		let y = b.field_with(Field::new("y", Codec::int(), |foo: &Foo| foo.y).default(0));
		b.finish(move |row| {
			Ok(Foo {
				x: row.get(&x)?,
				y: row.get(&y)?,
			})
		})
	})
}

#[test]
fn record_schema_renders_with_defaults() {
	assert_eq!(
		foo_codec().schema().unwrap().to_string(),
		r#"{"type":"record","name":"Foo","namespace":"p","fields":[{"name":"x","type":"int"},{"name":"y","type":"int","default":0}]}"#
	);
}

#[test]
fn records_round_trip() {
	let codec = foo_codec();
	let encoded = codec.to_value(&Foo { x: 7, y: 3 }).unwrap();
	match &encoded {
		Value::Record(record) => {
			assert_eq!(record.field("x"), Some(&Value::Int(7)));
			assert_eq!(record.field("y"), Some(&Value::Int(3)));
		}
		other => panic!("expected a record value, got {other:?}"),
	}
	assert_eq!(codec.from_value(&encoded).unwrap(), Foo { x: 7, y: 3 });
}

#[test]
fn missing_fields_fall_back_to_declared_defaults() {
	let only_x: Schema =
		r#"{"type":"record","name":"Foo","namespace":"p","fields":[{"name":"x","type":"int"}]}"#
			.parse()
			.unwrap();
	let incoming = Record::new(only_x, vec![Value::Int(7)]).unwrap();
	assert_eq!(
		foo_codec().from_value(&Value::Record(incoming)).unwrap(),
		Foo { x: 7, y: 0 }
	);
}

#[test]
fn missing_fields_without_defaults_fail() {
	let only_y: Schema =
		r#"{"type":"record","name":"Foo","namespace":"p","fields":[{"name":"y","type":"int"}]}"#
			.parse()
			.unwrap();
	let incoming = Record::new(only_y, vec![Value::Int(3)]).unwrap();
	assert_eq!(
		foo_codec()
			.from_value(&Value::Record(incoming))
			.unwrap_err()
			.to_string(),
		"record schema is missing field x and no default is declared while decoding p.Foo"
	);
}

#[test]
fn record_decoding_rejects_other_record_names() {
	let bar: Schema =
		r#"{"type":"record","name":"Bar","namespace":"p","fields":[{"name":"x","type":"int"}]}"#
			.parse()
			.unwrap();
	let incoming = Record::new(bar, vec![Value::Int(7)]).unwrap();
	assert_eq!(
		foo_codec()
			.from_value(&Value::Record(incoming))
			.unwrap_err()
			.to_string(),
		"got record with name p.Bar, expected name p.Foo"
	);
}

#[test]
fn reordered_fields_decode_by_name() {
	let reordered: Schema = r#"{
		"type": "record",
		"name": "Foo",
		"namespace": "p",
		"fields": [
			{"name": "y", "type": "int"},
			{"name": "x", "type": "int"}
		]
	}"#
	.parse()
	.unwrap();
	let incoming = Record::new(reordered, vec![Value::Int(3), Value::Int(7)]).unwrap();
	assert_eq!(
		foo_codec().from_value(&Value::Record(incoming)).unwrap(),
		Foo { x: 7, y: 3 }
	);
}

#[test]
fn field_aliases_are_consulted_on_decode() {
	let codec: Codec<Foo> = Codec::record("Foo").namespace("p").build(|b| {
		let x = b.field("x", Codec::int(), |foo: &Foo| foo.x);
		let y = b.field_with(Field::new("y", Codec::int(), |foo: &Foo| foo.y).alias("z"));
		b.finish(move |row| {
			Ok(Foo {
				x: row.get(&x)?,
				y: row.get(&y)?,
			})
		})
	});
	let renamed: Schema = r#"{
		"type": "record",
		"name": "Foo",
		"namespace": "p",
		"fields": [
			{"name": "x", "type": "int"},
			{"name": "z", "type": "int"}
		]
	}"#
	.parse()
	.unwrap();
	let incoming = Record::new(renamed, vec![Value::Int(1), Value::Int(2)]).unwrap();
	assert_eq!(
		codec.from_value(&Value::Record(incoming)).unwrap(),
		Foo { x: 1, y: 2 }
	);
}

#[test]
fn encoding_requires_every_declared_field_in_the_schema() {
	let only_x: Schema =
		r#"{"type":"record","name":"Foo","namespace":"p","fields":[{"name":"x","type":"int"}]}"#
			.parse()
			.unwrap();
	assert_eq!(
		foo_codec()
			.encode(&Foo { x: 7, y: 3 }, &only_x)
			.unwrap_err()
			.to_string(),
		"record schema is missing field y while encoding p.Foo"
	);
}

#[test]
fn schema_fields_unknown_to_the_program_encode_as_null() {
	let widened: Schema = r#"{
		"type": "record",
		"name": "Foo",
		"namespace": "p",
		"fields": [
			{"name": "x", "type": "int"},
			{"name": "extra", "type": "null"},
			{"name": "y", "type": "int"}
		]
	}"#
	.parse()
	.unwrap();
	let encoded = foo_codec().encode(&Foo { x: 7, y: 3 }, &widened).unwrap();
	match &encoded {
		Value::Record(record) => {
			assert_eq!(record.field("x"), Some(&Value::Int(7)));
			assert_eq!(record.field("extra"), Some(&Value::Null));
			assert_eq!(record.field("y"), Some(&Value::Int(3)));
		}
		other => panic!("expected a record value, got {other:?}"),
	}
}

#[test]
fn nested_records_round_trip() {
	#[derive(Debug, Clone, PartialEq)]
	struct Outer {
		id: i64,
		foo: Foo,
	}

	let codec: Codec<Outer> = Codec::record("Outer").namespace("p").build(|b| {
		let id = b.field("id", Codec::long(), |outer: &Outer| outer.id);
		let foo = b.field("foo", foo_codec(), |outer: &Outer| outer.foo.clone());
		b.finish(move |row| {
			Ok(Outer {
				id: row.get(&id)?,
				foo: row.get(&foo)?,
			})
		})
	});

	let value = Outer {
		id: 9,
		foo: Foo { x: 1, y: 2 },
	};
	let encoded = codec.to_value(&value).unwrap();
	assert_eq!(codec.from_value(&encoded).unwrap(), value);
}

#[test]
fn record_attributes_render_in_the_schema() {
	#[derive(Debug, Clone, PartialEq)]
	struct Documented {
		x: i32,
		y: i32,
	}

	let codec: Codec<Documented> = Codec::record("Documented")
		.namespace("p")
		.doc("A documented record")
		.prop("source", "tests")
		.build(|b| {
			let x = b.field_with(
				Field::new("x", Codec::int(), |d: &Documented| d.x).doc("the x"),
			);
			let y = b.field_with(
				Field::new("y", Codec::int(), |d: &Documented| d.y)
					.order(FieldOrder::Descending),
			);
			b.finish(move |row| {
				Ok(Documented {
					x: row.get(&x)?,
					y: row.get(&y)?,
				})
			})
		});
	assert_eq!(
		codec.schema().unwrap().to_string(),
		concat!(
			r#"{"type":"record","name":"Documented","namespace":"p","doc":"A documented record","#,
			r#""fields":[{"name":"x","doc":"the x","type":"int"},"#,
			r#"{"name":"y","type":"int","order":"descending"}],"source":"tests"}"#
		)
	);
}

#[test]
fn codecs_debug_render_their_schema() {
	let rendered = format!("{:?}", foo_codec());
	assert!(rendered.starts_with(r#"Codec({"type":"record","name":"Foo""#));
}
