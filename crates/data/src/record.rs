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

/// The key/value lines of one PBS section, in file order.
pub type SectionFields = indexmap::IndexMap<String, String>;

/// The body of a loaded game entity.
///
/// Entities loaded from a marshal file keep their entire decoded graph, so
/// instance variables this editor does not model survive a load/save round
/// trip untouched. Entities compiled out of a PBS text file keep the parsed
/// key/value pairs instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Graph(alox_48::Value),
    Fields(SectionFields),
}

impl Default for Record {
    fn default() -> Self {
        Self::Graph(alox_48::Value::Nil)
    }
}

impl Record {
    /// The marshal class of the underlying graph, if there is one.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Graph(value) => crate::graph::class_of(value),
            Self::Fields(_) => None,
        }
    }

    pub fn is_from_pbs(&self) -> bool {
        matches!(self, Self::Fields(_))
    }

    /// Renders the record back into a marshal graph of the given class.
    ///
    /// A PBS sourced record becomes an object whose instance variables hold
    /// the raw field text. The game's own compiler reparses PBS data on the
    /// next launch, so preserving the text verbatim is enough for an editor.
    pub fn to_graph(&self, class: &'static str) -> alox_48::Value {
        match self {
            Self::Graph(value) => value.clone(),
            Self::Fields(fields) => {
                let mut object = alox_48::Object {
                    class: class.into(),
                    fields: Default::default(),
                };
                for (key, value) in fields {
                    object.fields.insert(
                        key.as_str().into(),
                        alox_48::Value::String(value.clone().into()),
                    );
                }
                alox_48::Value::Object(object)
            }
        }
    }
}
