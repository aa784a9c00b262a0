// Copyright (C) 2024 the Fluorite developers
//
// This file is part of Fluorite.
//
// Fluorite is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Fluorite is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Fluorite.  If not, see <http://www.gnu.org/licenses/>.

//! Shape checks for decoded marshal graphs.
//!
//! Game data files decode into untyped [`alox_48::Value`] graphs, and the
//! data managers only ever rely on a handful of shapes inside them (a top
//! level hash or array, objects of a known class, a few scalar fields).
//! The helpers here verify those shapes and report a [`ShapeError`] when a
//! file contains a structurally valid marshal stream of the wrong kind,
//! which callers surface as "this file has the wrong contents" rather than
//! "this file is corrupt".

use alox_48::Value;

#[derive(thiserror::Error, Debug)]
pub enum ShapeError {
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected an instance of {expected}, found an instance of {found}")]
    WrongClass {
        expected: &'static str,
        found: String,
    },
    #[error("missing instance variable {0:?}")]
    MissingField(&'static str),
}

/// A short human readable name for the shape of a value, used in error
/// messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Bool(_) => "a boolean",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::String(_) => "a string",
        Value::Symbol(_) => "a symbol",
        Value::Array(_) => "an array",
        Value::Hash(_) => "a hash",
        Value::Object(_) => "an object",
        Value::Instance(instance) => kind_name(&instance.value),
        _ => "an unsupported value",
    }
}

/// The marshal class of an object graph, if it is one.
pub fn class_of(value: &Value) -> Option<&str> {
    match value {
        Value::Object(object) => Some(object.class.as_str()),
        Value::Instance(instance) => class_of(&instance.value),
        _ => None,
    }
}

/// Checks that `value` is an object of the given marshal class and
/// borrows it.
pub fn expect_class<'v>(
    value: &'v Value,
    class: &'static str,
) -> Result<&'v alox_48::Object, ShapeError> {
    match value {
        Value::Object(object) if object.class.as_str() == class => Ok(object),
        Value::Object(object) => Err(ShapeError::WrongClass {
            expected: class,
            found: object.class.as_str().to_string(),
        }),
        Value::Instance(instance) => expect_class(&instance.value, class),
        value => Err(ShapeError::UnexpectedShape {
            expected: "an object",
            found: kind_name(value),
        }),
    }
}

/// Consumes a top level array graph into its elements.
pub fn into_items(value: Value) -> Result<Vec<Value>, ShapeError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().collect()),
        Value::Instance(instance) => into_items(*instance.value),
        value => Err(ShapeError::UnexpectedShape {
            expected: "an array",
            found: kind_name(&value),
        }),
    }
}

/// Consumes a top level hash graph into its entries, preserving entry
/// order.
pub fn into_pairs(value: Value) -> Result<Vec<(Value, Value)>, ShapeError> {
    match value {
        Value::Hash(hash) => Ok(hash.into_iter().collect()),
        Value::Instance(instance) => into_pairs(*instance.value),
        value => Err(ShapeError::UnexpectedShape {
            expected: "a hash",
            found: kind_name(&value),
        }),
    }
}

/// Looks up an instance variable by name. Ruby marshal streams store
/// ivar names with a leading `@`, so both spellings are accepted.
pub fn field<'v>(object: &'v alox_48::Object, name: &str) -> Option<&'v Value> {
    object.fields.iter().find_map(|(key, value)| {
        let key = key.as_str();
        (key == name || key.strip_prefix('@') == Some(name)).then_some(value)
    })
}

pub fn require_field<'v>(
    object: &'v alox_48::Object,
    name: &'static str,
) -> Result<&'v Value, ShapeError> {
    field(object, name).ok_or(ShapeError::MissingField(name))
}

/// Overwrites an instance variable, appending it when absent.
pub fn set_field(object: &mut alox_48::Object, name: &str, value: Value) {
    let slot = object.fields.iter_mut().find_map(|(key, slot)| {
        let key = key.as_str();
        (key == name || key.strip_prefix('@') == Some(name)).then_some(slot)
    });
    match slot {
        Some(slot) => *slot = value,
        None => {
            object.fields.insert(name.into(), value);
        }
    }
}

pub fn int(value: &Value) -> Result<i32, ShapeError> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Instance(instance) => int(&instance.value),
        value => Err(ShapeError::UnexpectedShape {
            expected: "an integer",
            found: kind_name(value),
        }),
    }
}

/// Reads a string out of a value. Symbols also qualify since Essentials
/// keys its data stores by symbol.
pub fn string(value: &Value) -> Result<String, ShapeError> {
    match value {
        Value::String(string) => Ok(String::from_utf8_lossy(&string.data).into_owned()),
        Value::Symbol(symbol) => Ok(symbol.as_str().to_string()),
        Value::Instance(instance) => string(&instance.value),
        value => Err(ShapeError::UnexpectedShape {
            expected: "a string",
            found: kind_name(value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(class: &str, fields: Vec<(&str, Value)>) -> Value {
        let mut object = alox_48::Object {
            class: class.into(),
            fields: Default::default(),
        };
        for (name, value) in fields {
            object.fields.insert(name.into(), value);
        }
        Value::Object(object)
    }

    #[test]
    fn scalars_read_back() {
        assert_eq!(int(&Value::Integer(42)).unwrap(), 42);
        assert_eq!(
            string(&Value::String("hello".to_string().into())).unwrap(),
            "hello"
        );
        assert_eq!(string(&Value::Symbol("BULBASAUR".into())).unwrap(), "BULBASAUR");
    }

    #[test]
    fn scalar_shape_mismatches_name_both_sides() {
        let error = int(&Value::Nil).unwrap_err();
        assert_eq!(error.to_string(), "expected an integer, found nil");

        let error = string(&Value::Integer(3)).unwrap_err();
        assert_eq!(error.to_string(), "expected a string, found an integer");
    }

    #[test]
    fn into_items_accepts_only_arrays() {
        let items =
            into_items(Value::Array(vec![Value::Nil, Value::Integer(1)].into_iter().collect()))
                .unwrap();
        assert_eq!(items.len(), 2);

        assert!(matches!(
            into_items(Value::Integer(1)),
            Err(ShapeError::UnexpectedShape { expected: "an array", .. })
        ));
    }

    #[test]
    fn into_pairs_preserves_order() {
        let hash = Value::Hash(
            vec![
                (Value::Integer(3), Value::Nil),
                (Value::Integer(1), Value::Nil),
                (Value::Integer(2), Value::Nil),
            ]
            .into_iter()
            .collect(),
        );
        let keys: Vec<i32> = into_pairs(hash)
            .unwrap()
            .iter()
            .map(|(key, _)| int(key).unwrap())
            .collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn expect_class_checks_the_class() {
        let value = object("RPG::Tileset", vec![("id", Value::Integer(1))]);
        assert!(expect_class(&value, "RPG::Tileset").is_ok());

        let error = expect_class(&value, "RPG::Map").unwrap_err();
        assert_eq!(
            error.to_string(),
            "expected an instance of RPG::Map, found an instance of RPG::Tileset"
        );

        assert!(matches!(
            expect_class(&Value::Nil, "RPG::Map"),
            Err(ShapeError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn fields_are_found_with_or_without_the_at_sign() {
        let value = object("RPG::Tileset", vec![("@id", Value::Integer(7))]);
        let Value::Object(object) = &value else {
            unreachable!()
        };
        assert_eq!(int(field(object, "id").unwrap()).unwrap(), 7);
        assert_eq!(int(field(object, "@id").unwrap()).unwrap(), 7);
        assert!(field(object, "name").is_none());
        assert!(matches!(
            require_field(object, "name"),
            Err(ShapeError::MissingField("name"))
        ));
    }

    #[test]
    fn set_field_overwrites_prefixed_ivars_in_place() {
        let value = object("RPG::System", vec![("@magic_number", Value::Integer(1))]);
        let Value::Object(mut object) = value else {
            unreachable!()
        };
        set_field(&mut object, "magic_number", Value::Integer(2));
        assert_eq!(object.fields.len(), 1);
        assert_eq!(int(field(&object, "magic_number").unwrap()).unwrap(), 2);

        set_field(&mut object, "name", Value::Nil);
        assert_eq!(object.fields.len(), 2);
    }
}
