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

//! The concrete data managers, one per entity kind.
//!
//! Each manager owns one file (or family of files, for maps) and one
//! store on [`fluorite_data::ProjectData`]. They are stateless unit
//! structs; all state lives in the [`crate::manager::LoadContext`] the
//! orchestrator passes through.

mod encounters;
mod metadata;
mod named;
mod rmxp;
mod scripts;
mod trainers;

pub use encounters::EncounterManager;
pub use metadata::{MetadataManager, PlayerMetadataManager};
pub use named::{
    AbilityManager, ItemManager, MoveManager, SpeciesManager, TrainerTypeManager, TypeManager,
};
pub use rmxp::{CommonEventManager, MapManager, SystemManager, TilesetManager};
pub use scripts::ScriptManager;
pub use trainers::TrainerManager;
