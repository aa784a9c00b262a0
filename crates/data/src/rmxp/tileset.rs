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

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tileset {
    pub id: i32,
    pub name: String,
    pub record: Record,
}

impl Tileset {
    pub const CLASS: &'static str = "RPG::Tileset";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        let (id, name) = {
            let object = graph::expect_class(&value, Self::CLASS)?;
            (
                graph::int(graph::require_field(object, "id")?)?,
                graph::string(graph::require_field(object, "name")?)?,
            )
        };
        Ok(Self {
            id,
            name,
            record: Record::Graph(value),
        })
    }

    pub fn to_graph(&self) -> alox_48::Value {
        let mut value = self.record.to_graph(Self::CLASS);
        if let alox_48::Value::Object(object) = &mut value {
            graph::set_field(object, "id", alox_48::Value::Integer(self.id));
            graph::set_field(
                object,
                "name",
                alox_48::Value::String(self.name.clone().into()),
            );
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset_graph(id: i32, name: &str) -> alox_48::Value {
        let mut object = alox_48::Object {
            class: Tileset::CLASS.into(),
            fields: Default::default(),
        };
        object.fields.insert("@id".into(), alox_48::Value::Integer(id));
        object
            .fields
            .insert("@name".into(), alox_48::Value::String(name.to_string().into()));
        object
            .fields
            .insert("@panorama_hue".into(), alox_48::Value::Integer(120));
        alox_48::Value::Object(object)
    }

    #[test]
    fn from_graph_reads_the_identity_fields() {
        let tileset = Tileset::from_graph(tileset_graph(4, "Forest")).unwrap();
        assert_eq!(tileset.id, 4);
        assert_eq!(tileset.name, "Forest");
    }

    #[test]
    fn from_graph_rejects_other_classes() {
        let mut object = alox_48::Object {
            class: "RPG::Map".into(),
            fields: Default::default(),
        };
        object.fields.insert("@id".into(), alox_48::Value::Integer(1));
        let error = Tileset::from_graph(alox_48::Value::Object(object)).unwrap_err();
        assert!(matches!(error, ShapeError::WrongClass { .. }));
    }

    #[test]
    fn to_graph_patches_edits_and_keeps_unmodelled_fields() {
        let mut tileset = Tileset::from_graph(tileset_graph(4, "Forest")).unwrap();
        tileset.name = "Dark Forest".to_string();

        let value = tileset.to_graph();
        let object = graph::expect_class(&value, Tileset::CLASS).unwrap();
        assert_eq!(
            graph::string(graph::field(object, "name").unwrap()).unwrap(),
            "Dark Forest"
        );
        assert_eq!(
            graph::int(graph::field(object, "panorama_hue").unwrap()).unwrap(),
            120
        );
    }
}
