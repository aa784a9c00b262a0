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

use fluorite_data::essentials::{EncounterKey, EncounterTable};

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::retry::FileError;

/// Wild encounter tables, keyed by map id and battle version.
pub struct EncounterManager;

impl EncounterManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Encounters,
        class_name: Some(EncounterTable::CLASS),
        filename: "encounters.dat",
        pbs_filename: Some("encounters.txt"),
        message: "Encounters",
        from_pbs: false,
    };
}

impl DataManager for EncounterManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let mut encounters = indexmap::IndexMap::new();
        self.load_as_hash(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            &mut |_key, value| {
                let table = EncounterTable::from_graph(value)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                encounters.insert(table.key, table);
                Ok(())
            },
        )?;
        ctx.data.encounters = encounters;
        Ok(())
    }

    fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR
            .pbs_path()
            .unwrap_or_else(|| Self::DESCRIPTOR.data_path());
        let mut encounters = indexmap::IndexMap::new();
        self.parse_pbs(ctx.filesystem, ctx.session, &path, &mut |id, fields| {
            let Some(id) = id else {
                return Ok(());
            };
            // Headers are `[map]` or `[map,version]`. A header that parses
            // as neither is not an encounter table (hand-edited files grow
            // all sorts of stray sections), so it is skipped, not fatal.
            let Some(key) = EncounterKey::parse_section_id(id) else {
                tracing::warn!("{path}: ignoring unrecognized section header [{id}]");
                return Ok(());
            };
            encounters.insert(key, EncounterTable::from_fields(key, fields));
            Ok(())
        })?;
        ctx.session.set_progress(1.0);
        ctx.data.encounters = encounters;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let entries = ctx
            .data
            .encounters
            .values()
            .map(|table| {
                let key = alox_48::Value::Array(
                    vec![
                        alox_48::Value::Integer(table.key.map_id),
                        alox_48::Value::Integer(table.key.version),
                    ]
                    .into_iter()
                    .collect(),
                );
                (key, table.to_graph())
            })
            .collect();
        self.save_as_hash(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            entries,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.encounters.clear();
    }
}
