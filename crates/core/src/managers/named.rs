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

//! Managers for the Essentials entities keyed by an uppercase textual
//! id. All six share one layout on disk (a hash from id symbol to
//! `GameData` object) and one layout in PBS (one section per entity, the
//! header being the id), so they come out of one macro.

use fluorite_data::essentials::{Ability, ElementalType, Item, Move, Species, TrainerType};

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::retry::FileError;

macro_rules! named_managers {
    ($($manager:ident($entity:ident in $store:ident): $kind:ident, $file:literal, $pbs:literal, $message:literal;)*) => {
        $(
            pub struct $manager;

            impl $manager {
                const DESCRIPTOR: Descriptor = Descriptor {
                    kind: DataKind::$kind,
                    class_name: Some($entity::CLASS),
                    filename: $file,
                    pbs_filename: Some($pbs),
                    message: $message,
                    from_pbs: false,
                };
            }

            impl DataManager for $manager {
                fn descriptor(&self) -> &Descriptor {
                    &Self::DESCRIPTOR
                }

                fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
                    let path = Self::DESCRIPTOR.data_path();
                    let mut store = indexmap::IndexMap::new();
                    self.load_as_hash(
                        ctx.filesystem,
                        ctx.retry,
                        ctx.session,
                        &path,
                        &mut |_key, value| {
                            // the hash key repeats the record's own @id
                            let entity = $entity::from_graph(value)
                                .map_err(|error| FileError::classified(&path, error.into()))?;
                            if let Some(previous) = store.insert(entity.id.clone(), entity) {
                                tracing::warn!("{path} defines {} more than once", previous.id);
                            }
                            Ok(())
                        },
                    )?;
                    ctx.data.$store = store;
                    Ok(())
                }

                fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
                    let path = Self::DESCRIPTOR
                        .pbs_path()
                        .unwrap_or_else(|| Self::DESCRIPTOR.data_path());
                    let mut store = indexmap::IndexMap::new();
                    self.parse_pbs(ctx.filesystem, ctx.session, &path, &mut |id, fields| {
                        let Some(id) = id else {
                            // preamble before the first header carries no entity
                            return Ok(());
                        };
                        if store
                            .insert(id.to_string(), $entity::from_fields(id, fields))
                            .is_some()
                        {
                            tracing::warn!("{path} defines [{id}] more than once");
                        }
                        Ok(())
                    })?;
                    ctx.session.set_progress(1.0);
                    ctx.data.$store = store;
                    Ok(())
                }

                fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
                    let entries = ctx
                        .data
                        .$store
                        .values()
                        .map(|entity| {
                            (
                                alox_48::Value::Symbol(entity.id.as_str().into()),
                                entity.to_graph(),
                            )
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
                    data.$store.clear();
                }
            }
        )*
    };
}

named_managers! {
    SpeciesManager(Species in species): Species, "species.dat", "pokemon.txt", "Species";
    AbilityManager(Ability in abilities): Abilities, "abilities.dat", "abilities.txt", "Abilities";
    ItemManager(Item in items): Items, "items.dat", "items.txt", "Items";
    MoveManager(Move in moves): Moves, "moves.dat", "moves.txt", "Moves";
    TypeManager(ElementalType in types): Types, "types.dat", "types.txt", "Types";
    TrainerTypeManager(TrainerType in trainer_types): TrainerTypes, "trainer_types.dat", "trainer_types.txt", "Trainer Types";
}
