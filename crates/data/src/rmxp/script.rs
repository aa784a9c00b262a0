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

use rand::Rng;

/// One entry of the RGSS script list.
///
/// On disk each script is a three element array of id, name and the zlib
/// compressed script body. The body is inflated on load and deflated again
/// on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub id: u32,
    pub name: String,
    pub script_text: String,
}

impl Script {
    /// Creates a new `Script` with a random ID.
    pub fn new(name: impl Into<String>, script_text: impl Into<String>) -> Self {
        Self {
            id: rand::thread_rng().gen_range(0..=99999999),
            name: name.into(),
            script_text: script_text.into(),
        }
    }
}

impl<'de> alox_48::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, alox_48::DeError>
    where
        D: alox_48::DeserializerTrait<'de>,
    {
        struct Visitor;

        impl<'de> alox_48::Visitor<'de> for Visitor {
            type Value = Script;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("an array")
            }

            fn visit_array<A>(self, mut array: A) -> Result<Self::Value, alox_48::DeError>
            where
                A: alox_48::ArrayAccess<'de>,
            {
                use std::io::Read;

                let Some(id) = array.next_element()? else {
                    return Err(alox_48::DeError::missing_field("id".into()));
                };

                let Some(name) = array.next_element()? else {
                    return Err(alox_48::DeError::missing_field("name".into()));
                };

                let Some(data) = array.next_element::<alox_48::RbString>()? else {
                    return Err(alox_48::DeError::missing_field("data".into()));
                };

                let mut decoder = flate2::bufread::ZlibDecoder::new(data.data.as_slice());
                let mut script = String::new();
                decoder
                    .read_to_string(&mut script)
                    .map_err(alox_48::DeError::custom)?;

                Ok(Script {
                    id,
                    name,
                    script_text: script,
                })
            }
        }

        deserializer.deserialize(Visitor)
    }
}

impl alox_48::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, alox_48::SerError>
    where
        S: alox_48::SerializerTrait,
    {
        use alox_48::SerializeArray;
        use std::io::Write;

        let mut array = serializer.serialize_array(3)?;

        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), Default::default());
        let data = encoder
            .write_all(self.script_text.as_bytes())
            .and_then(|_| encoder.finish())
            .map_err(alox_48::SerError::custom)?;

        array.serialize_element(&self.id)?;
        array.serialize_element(&self.name)?;
        array.serialize_element(&alox_48::RbString { data })?;

        array.end()
    }
}
