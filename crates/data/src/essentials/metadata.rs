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
use crate::record::{Record, SectionFields};

/// The global game metadata, stored under key 0 of `metadata.dat`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub record: Record,
}

impl Metadata {
    pub const CLASS: &'static str = "GameData::Metadata";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        graph::expect_class(&value, Self::CLASS)?;
        Ok(Self {
            record: Record::Graph(value),
        })
    }

    pub fn from_fields(fields: SectionFields) -> Self {
        Self {
            record: Record::Fields(fields),
        }
    }

    pub fn to_graph(&self) -> alox_48::Value {
        self.record.to_graph(Self::CLASS)
    }
}

/// Per-character metadata, split out of [`Metadata`] in Essentials v20.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMetadata {
    pub id: i32,
    pub record: Record,
}

impl PlayerMetadata {
    pub const CLASS: &'static str = "GameData::PlayerMetadata";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        let id = {
            let object = graph::expect_class(&value, Self::CLASS)?;
            graph::int(graph::require_field(object, "id")?)?
        };
        Ok(Self {
            id,
            record: Record::Graph(value),
        })
    }

    pub fn from_fields(id: i32, fields: SectionFields) -> Self {
        Self {
            id,
            record: Record::Fields(fields),
        }
    }

    /// Builds a player's metadata from its slot in a combined pre-v20
    /// `metadata.dat` hash, where player records kept the global
    /// metadata class.
    pub fn from_combined(id: i32, record: Record) -> Self {
        Self { id, record }
    }

    pub fn to_graph(&self) -> alox_48::Value {
        let mut value = self.record.to_graph(Self::CLASS);
        if let alox_48::Value::Object(object) = &mut value {
            graph::set_field(object, "id", alox_48::Value::Integer(self.id));
        }
        value
    }
}
