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

use crate::graph::{self, ShapeError};
use crate::record::Record;

/// The single `RPG::System` object in `System.rxdata`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct System {
    pub record: Record,
}

impl System {
    pub const CLASS: &'static str = "RPG::System";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        graph::expect_class(&value, Self::CLASS)?;
        Ok(Self {
            record: Record::Graph(value),
        })
    }

    pub fn magic_number(&self) -> Option<i32> {
        let Record::Graph(value) = &self.record else {
            return None;
        };
        let object = graph::expect_class(value, Self::CLASS).ok()?;
        graph::int(graph::field(object, "magic_number")?).ok()
    }

    /// Replaces the magic number with a fresh random value. RPG Maker
    /// uses it to detect stale map caches, so every save rolls a new one.
    pub fn reroll_magic_number(&mut self) {
        if let Record::Graph(alox_48::Value::Object(object)) = &mut self.record {
            graph::set_field(
                object,
                "magic_number",
                alox_48::Value::Integer(rand::random()),
            );
        }
    }

    pub fn to_graph(&self) -> alox_48::Value {
        self.record.to_graph(Self::CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_graph(magic_number: i32) -> alox_48::Value {
        let mut object = alox_48::Object {
            class: System::CLASS.into(),
            fields: Default::default(),
        };
        object
            .fields
            .insert("@magic_number".into(), alox_48::Value::Integer(magic_number));
        object.fields.insert(
            "@title".into(),
            alox_48::Value::String("Emerald Quartz".to_string().into()),
        );
        alox_48::Value::Object(object)
    }

    #[test]
    fn reroll_replaces_the_magic_number_in_the_graph() {
        let mut system = System::from_graph(system_graph(77)).unwrap();
        assert_eq!(system.magic_number(), Some(77));

        system.reroll_magic_number();
        let rerolled = system.magic_number().unwrap();

        let value = system.to_graph();
        let object = graph::expect_class(&value, System::CLASS).unwrap();
        assert_eq!(
            graph::int(graph::field(object, "magic_number").unwrap()).unwrap(),
            rerolled
        );
        assert_eq!(
            graph::string(graph::field(object, "title").unwrap()).unwrap(),
            "Emerald Quartz"
        );
    }

    #[test]
    fn only_system_objects_are_accepted() {
        let mut object = alox_48::Object {
            class: "RPG::Tileset".into(),
            fields: Default::default(),
        };
        object.fields.insert("@id".into(), alox_48::Value::Integer(1));
        let error = System::from_graph(alox_48::Value::Object(object)).unwrap_err();
        assert!(matches!(error, ShapeError::WrongClass { .. }));
    }
}
