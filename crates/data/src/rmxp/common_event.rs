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
pub struct CommonEvent {
    pub id: i32,
    pub name: String,
    pub record: Record,
}

impl CommonEvent {
    pub const CLASS: &'static str = "RPG::CommonEvent";

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
