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

//! Managers for the classic RMXP data files: tilesets, maps, common
//! events and the system object.

use fluorite_data::graph;
use fluorite_data::rmxp::{CommonEvent, Map, MapInfo, System, Tileset};

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::marshal;
use crate::retry::FileError;
use crate::session::fraction;

pub struct TilesetManager;

impl TilesetManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Tilesets,
        class_name: Some(Tileset::CLASS),
        filename: "Tilesets.rxdata",
        pbs_filename: None,
        message: "Tilesets",
        from_pbs: false,
    };
}

impl DataManager for TilesetManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let mut tilesets = Vec::new();
        self.load_as_array(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            true,
            &mut |item| {
                if matches!(item, alox_48::Value::Nil) {
                    return Ok(());
                }
                let tileset = Tileset::from_graph(item)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                tilesets.push(tileset);
                Ok(())
            },
        )?;
        ctx.data.tilesets = tilesets;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let items = ctx.data.tilesets.iter().map(Tileset::to_graph).collect();
        self.save_as_array(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            true,
            items,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.tilesets.clear();
    }
}

pub struct MapManager;

impl MapManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Maps,
        class_name: Some(Map::CLASS),
        filename: "MapInfos.rxdata",
        pbs_filename: None,
        message: "Maps",
        from_pbs: false,
    };

    fn map_path(id: i32) -> camino::Utf8PathBuf {
        camino::Utf8PathBuf::from("Data").join(format!("Map{id:0>3}.rxdata"))
    }
}

impl DataManager for MapManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let infos_path = Self::DESCRIPTOR.data_path();
        let mut infos = indexmap::IndexMap::new();
        self.load_as_hash(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &infos_path,
            &mut |key, value| {
                let id = graph::int(&key)
                    .map_err(|error| FileError::classified(&infos_path, error.into()))?;
                let info = MapInfo::from_graph(value)
                    .map_err(|error| FileError::classified(&infos_path, error.into()))?;
                infos.insert(id, info);
                Ok(())
            },
        )?;

        let mut maps = indexmap::IndexMap::new();
        let count = infos.len();
        for (index, &id) in infos.keys().enumerate() {
            if ctx.session.stopped() {
                break;
            }
            let path = Self::map_path(id);
            let value = marshal::read_value(ctx.filesystem, ctx.retry, &path)?;
            let map = Map::from_graph(id, value)
                .map_err(|error| FileError::classified(&path, error.into()))?;
            // Tilesets are already loaded at this point, so a dangling
            // reference means the project itself is inconsistent.
            if let Some(tileset_id) = map.tileset_id() {
                if !ctx.data.tilesets.iter().any(|t| t.id == tileset_id) {
                    tracing::warn!("{path} references tileset {tileset_id}, which does not exist");
                }
            }
            maps.insert(id, map);
            ctx.session.set_progress(fraction(index, count));
        }

        ctx.data.map_infos = infos;
        ctx.data.maps = maps;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        // every map file is its own save: one locked map must not keep
        // the others (or MapInfos) from being written
        for (&id, map) in &ctx.data.maps {
            let path = Self::map_path(id);
            if let Err(error) =
                marshal::write_data(ctx.filesystem, ctx.retry, &path, &map.to_graph())
            {
                let message = error.to_save_message();
                tracing::error!("{message}");
                ctx.session.push_problem(message);
            }
        }

        let entries = ctx
            .data
            .map_infos
            .iter()
            .map(|(&id, info)| (alox_48::Value::Integer(id), info.to_graph()))
            .collect();
        self.save_as_hash(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            entries,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.map_infos.clear();
        data.maps.clear();
    }
}

pub struct CommonEventManager;

impl CommonEventManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::CommonEvents,
        class_name: Some(CommonEvent::CLASS),
        filename: "CommonEvents.rxdata",
        pbs_filename: None,
        message: "Common Events",
        from_pbs: false,
    };
}

impl DataManager for CommonEventManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let mut events = Vec::new();
        self.load_as_array(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            true,
            &mut |item| {
                if matches!(item, alox_48::Value::Nil) {
                    return Ok(());
                }
                let event = CommonEvent::from_graph(item)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                events.push(event);
                Ok(())
            },
        )?;
        ctx.data.common_events = events;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let items = ctx
            .data
            .common_events
            .iter()
            .map(CommonEvent::to_graph)
            .collect();
        self.save_as_array(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            true,
            items,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.common_events.clear();
    }
}

pub struct SystemManager;

impl SystemManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::System,
        class_name: Some(System::CLASS),
        filename: "System.rxdata",
        pbs_filename: None,
        message: "System",
        from_pbs: false,
    };
}

impl DataManager for SystemManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let value = marshal::read_value(ctx.filesystem, ctx.retry, &path)?;
        let system =
            System::from_graph(value).map_err(|error| FileError::classified(&path, error.into()))?;
        ctx.data.system = Some(system);
        ctx.session.set_progress(1.0);
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let Some(system) = &ctx.data.system else {
            return Ok(());
        };
        marshal::write_data(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            &system.to_graph(),
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.system = None;
    }
}
