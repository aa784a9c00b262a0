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

/// One `MapXXX.rxdata` body. The map id is not stored inside the file, it
/// comes from the file name and the `MapInfos.rxdata` key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    pub id: i32,
    pub record: Record,
}

impl Map {
    pub const CLASS: &'static str = "RPG::Map";

    pub fn from_graph(id: i32, value: alox_48::Value) -> Result<Self, ShapeError> {
        graph::expect_class(&value, Self::CLASS)?;
        Ok(Self {
            id,
            record: Record::Graph(value),
        })
    }

    /// The tileset this map draws from, when the graph records one.
    pub fn tileset_id(&self) -> Option<i32> {
        let Record::Graph(value) = &self.record else {
            return None;
        };
        let object = graph::expect_class(value, Self::CLASS).ok()?;
        graph::int(graph::field(object, "tileset_id")?).ok()
    }

    pub fn to_graph(&self) -> alox_48::Value {
        self.record.to_graph(Self::CLASS)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapInfo {
    pub name: String,
    pub record: Record,
}

impl MapInfo {
    pub const CLASS: &'static str = "RPG::MapInfo";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        let name = {
            let object = graph::expect_class(&value, Self::CLASS)?;
            graph::string(graph::require_field(object, "name")?)?
        };
        Ok(Self {
            name,
            record: Record::Graph(value),
        })
    }

    pub fn to_graph(&self) -> alox_48::Value {
        let mut value = self.record.to_graph(Self::CLASS);
        if let alox_48::Value::Object(object) = &mut value {
            graph::set_field(
                object,
                "name",
                alox_48::Value::String(self.name.clone().into()),
            );
        }
        value
    }
}
