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

//! The game metadata managers.
//!
//! Before Essentials v20, player metadata lived inside `metadata.dat`
//! alongside the global record (key 0 is global, higher keys are
//! players). v20 split the players into `player_metadata.dat`. The
//! metadata manager therefore runs first and marks
//! [`fluorite_data::ProjectData::player_metadata_preloaded`] when it has
//! already produced the player records; the player metadata manager must
//! run after it and yields when the mark is set. The orchestrator
//! enforces that ordering at construction.

use fluorite_data::essentials::{Metadata, PlayerMetadata};
use fluorite_data::{graph, Record};

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::retry::FileError;

pub struct MetadataManager;

impl MetadataManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Metadata,
        class_name: Some(Metadata::CLASS),
        filename: "metadata.dat",
        pbs_filename: Some("metadata.txt"),
        message: "Metadata",
        from_pbs: false,
    };
}

impl DataManager for MetadataManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let split = ctx.config.project.essentials_version.splits_player_metadata();

        let mut metadata = None;
        let mut players = indexmap::IndexMap::new();
        self.load_as_hash(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            &mut |key, value| {
                let id = graph::int(&key)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                if id == 0 {
                    let record = Metadata::from_graph(value)
                        .map_err(|error| FileError::classified(&path, error.into()))?;
                    metadata = Some(record);
                } else if !split {
                    players.insert(id, PlayerMetadata::from_combined(id, Record::Graph(value)));
                } else {
                    tracing::warn!("{path}: ignoring unexpected metadata entry {id}");
                }
                Ok(())
            },
        )?;

        ctx.data.metadata = metadata;
        if !players.is_empty() {
            ctx.data.player_metadata = players;
            ctx.data.player_metadata_preloaded = true;
        }
        Ok(())
    }

    fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR
            .pbs_path()
            .unwrap_or_else(|| Self::DESCRIPTOR.data_path());
        let split = ctx.config.project.essentials_version.splits_player_metadata();

        let mut metadata = None;
        let mut players = indexmap::IndexMap::new();
        self.parse_pbs(ctx.filesystem, ctx.session, &path, &mut |id, fields| {
            let Some(id) = id else {
                return Ok(());
            };
            let Ok(id) = id.trim().parse::<i32>() else {
                tracing::warn!("{path}: ignoring unrecognized section header [{id}]");
                return Ok(());
            };
            if id == 0 {
                metadata = Some(Metadata::from_fields(fields));
            } else if !split {
                players.insert(id, PlayerMetadata::from_fields(id, fields));
            } else {
                tracing::warn!("{path}: ignoring unexpected metadata section {id}");
            }
            Ok(())
        })?;
        ctx.session.set_progress(1.0);

        ctx.data.metadata = metadata;
        if !players.is_empty() {
            ctx.data.player_metadata = players;
            ctx.data.player_metadata_preloaded = true;
        }
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let mut entries = Vec::new();
        if let Some(metadata) = &ctx.data.metadata {
            entries.push((alox_48::Value::Integer(0), metadata.to_graph()));
        }
        // preloaded players belong in this file, not player_metadata.dat
        if ctx.data.player_metadata_preloaded {
            entries.extend(
                ctx.data
                    .player_metadata
                    .values()
                    .map(|player| (alox_48::Value::Integer(player.id), player.to_graph())),
            );
        }
        self.save_as_hash(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            entries,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.metadata = None;
    }
}

pub struct PlayerMetadataManager;

impl PlayerMetadataManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::PlayerMetadata,
        class_name: Some(PlayerMetadata::CLASS),
        filename: "player_metadata.dat",
        pbs_filename: Some("player_metadata.txt"),
        message: "Player Metadata",
        from_pbs: false,
    };

    /// Whether the metadata pass already settled the player records, in
    /// which case this manager has nothing to do.
    fn covered_by_metadata(ctx: &LoadContext<'_, '_>) -> bool {
        ctx.data.player_metadata_preloaded
            || !ctx.config.project.essentials_version.splits_player_metadata()
    }
}

impl DataManager for PlayerMetadataManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        if Self::covered_by_metadata(ctx) {
            ctx.session.set_progress(1.0);
            return Ok(());
        }

        let path = Self::DESCRIPTOR.data_path();
        let mut players = indexmap::IndexMap::new();
        self.load_as_hash(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            &mut |_key, value| {
                let player = PlayerMetadata::from_graph(value)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                players.insert(player.id, player);
                Ok(())
            },
        )?;
        ctx.data.player_metadata = players;
        Ok(())
    }

    fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        if Self::covered_by_metadata(ctx) {
            ctx.session.set_progress(1.0);
            return Ok(());
        }

        let path = Self::DESCRIPTOR
            .pbs_path()
            .unwrap_or_else(|| Self::DESCRIPTOR.data_path());
        let mut players = indexmap::IndexMap::new();
        self.parse_pbs(ctx.filesystem, ctx.session, &path, &mut |id, fields| {
            let Some(id) = id else {
                return Ok(());
            };
            let Ok(id) = id.trim().parse::<i32>() else {
                tracing::warn!("{path}: ignoring unrecognized section header [{id}]");
                return Ok(());
            };
            players.insert(id, PlayerMetadata::from_fields(id, fields));
            Ok(())
        })?;
        ctx.session.set_progress(1.0);
        ctx.data.player_metadata = players;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        if ctx.data.player_metadata_preloaded {
            // the metadata manager writes these into metadata.dat
            return Ok(());
        }
        let entries = ctx
            .data
            .player_metadata
            .values()
            .map(|player| (alox_48::Value::Integer(player.id), player.to_graph()))
            .collect();
        self.save_as_hash(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            entries,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.player_metadata.clear();
        data.player_metadata_preloaded = false;
    }
}
