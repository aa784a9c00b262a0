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

/// The map id and battle version a wild encounter table belongs to.
///
/// `encounters.txt` writes this as `[003]` or `[003,1]`. Version 0 is the
/// base table and omits the second component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncounterKey {
    pub map_id: i32,
    pub version: i32,
}

impl EncounterKey {
    /// Parses a section header like `003` or `003,1`.
    pub fn parse_section_id(id: &str) -> Option<Self> {
        let mut parts = id.splitn(2, ',');
        let map_id = parts.next()?.trim().parse().ok()?;
        let version = match parts.next() {
            Some(version) => version.trim().parse().ok()?,
            None => 0,
        };
        Some(Self { map_id, version })
    }
}

impl std::fmt::Display for EncounterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version > 0 {
            write!(f, "{:0>3},{}", self.map_id, self.version)
        } else {
            write!(f, "{:0>3}", self.map_id)
        }
    }
}

/// The wild encounter tables for one map and version.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterTable {
    pub key: EncounterKey,
    pub record: Record,
}

impl EncounterTable {
    pub const CLASS: &'static str = "GameData::Encounter";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        let key = {
            let object = graph::expect_class(&value, Self::CLASS)?;
            let map_id = graph::int(graph::require_field(object, "map")?)?;
            let version = match graph::field(object, "version") {
                Some(value) => graph::int(value)?,
                None => 0,
            };
            EncounterKey { map_id, version }
        };
        Ok(Self {
            key,
            record: Record::Graph(value),
        })
    }

    pub fn from_fields(key: EncounterKey, fields: SectionFields) -> Self {
        Self {
            key,
            record: Record::Fields(fields),
        }
    }

    pub fn to_graph(&self) -> alox_48::Value {
        let mut value = self.record.to_graph(Self::CLASS);
        if let alox_48::Value::Object(object) = &mut value {
            graph::set_field(object, "map", alox_48::Value::Integer(self.key.map_id));
            graph::set_field(object, "version", alox_48::Value::Integer(self.key.version));
        }
        value
    }
}
