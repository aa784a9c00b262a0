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

/// A single trainer battle definition.
///
/// Trainers have no id of their own in the compiled data. They are keyed
/// by trainer type, display name and battle version, so we synthesize the
/// `TYPE,Name` form that `trainers.txt` uses for its section headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trainer {
    pub id: String,
    pub record: Record,
}

impl Trainer {
    pub const CLASS: &'static str = "GameData::Trainer";

    pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
        let id = {
            let object = graph::expect_class(&value, Self::CLASS)?;
            let trainer_type = graph::string(graph::require_field(object, "trainer_type")?)?;
            let name = graph::string(graph::require_field(object, "real_name")?)?;
            let version = match graph::field(object, "version") {
                Some(value) => graph::int(value)?,
                None => 0,
            };
            if version > 0 {
                format!("{trainer_type},{name},{version}")
            } else {
                format!("{trainer_type},{name}")
            }
        };
        Ok(Self {
            id,
            record: Record::Graph(value),
        })
    }

    pub fn from_fields(id: impl Into<String>, fields: SectionFields) -> Self {
        Self {
            id: id.into(),
            record: Record::Fields(fields),
        }
    }

    pub fn to_graph(&self) -> alox_48::Value {
        self.record.to_graph(Self::CLASS)
    }
}
