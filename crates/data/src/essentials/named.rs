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

//! The Essentials entities keyed by an uppercase textual id, such as
//! `BULBASAUR` or `THUNDERBOLT`.
//!
//! Their compiled `.dat` files all share one layout: a hash from the id
//! symbol to a `GameData` object whose `@id` repeats the key. The types
//! here only lift out that id and keep the rest of the object as an
//! opaque [`Record`].

use crate::graph::{self, ShapeError};
use crate::record::{Record, SectionFields};

macro_rules! named_entities {
    ($($name:ident => $class:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct $name {
                pub id: String,
                pub record: Record,
            }

            impl $name {
                pub const CLASS: &'static str = $class;

                pub fn from_graph(value: alox_48::Value) -> Result<Self, ShapeError> {
                    let id = {
                        let object = graph::expect_class(&value, Self::CLASS)?;
                        graph::string(graph::require_field(object, "id")?)?
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
                    let mut value = self.record.to_graph(Self::CLASS);
                    if let alox_48::Value::Object(object) = &mut value {
                        graph::set_field(
                            object,
                            "id",
                            alox_48::Value::Symbol(self.id.as_str().into()),
                        );
                    }
                    value
                }
            }
        )*
    };
}

named_entities! {
    Species => "GameData::Species",
    Ability => "GameData::Ability",
    Move => "GameData::Move",
    Item => "GameData::Item",
    ElementalType => "GameData::Type",
    TrainerType => "GameData::TrainerType",
}
