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

pub mod graph;
pub mod record;

// RPG Maker XP types
pub mod rmxp;

// Pokémon Essentials types
pub mod essentials;

pub use graph::ShapeError;
pub use record::{Record, SectionFields};

use indexmap::IndexMap;

use essentials::{
    Ability, ElementalType, EncounterKey, EncounterTable, Item, Metadata, Move, PlayerMetadata,
    Species, Trainer, TrainerType,
};
use rmxp::{CommonEvent, Map, MapInfo, Script, System, Tileset};

/// Every loaded store of one open project.
///
/// Insertion order is file order, which the save path preserves.
#[derive(Debug, Default)]
pub struct ProjectData {
    pub scripts: Vec<Script>,
    pub tilesets: Vec<Tileset>,
    pub map_infos: IndexMap<i32, MapInfo>,
    pub maps: IndexMap<i32, Map>,
    pub common_events: Vec<CommonEvent>,
    pub system: Option<System>,

    pub species: IndexMap<String, Species>,
    pub abilities: IndexMap<String, Ability>,
    pub moves: IndexMap<String, Move>,
    pub items: IndexMap<String, Item>,
    pub types: IndexMap<String, ElementalType>,
    pub trainer_types: IndexMap<String, TrainerType>,
    pub trainers: Vec<Trainer>,
    pub encounters: IndexMap<EncounterKey, EncounterTable>,
    pub metadata: Option<Metadata>,
    pub player_metadata: IndexMap<i32, PlayerMetadata>,
    /// Set when a pre-v20 metadata file already provided player 1, so the
    /// player metadata pass must not clobber it.
    pub player_metadata_preloaded: bool,
}

impl ProjectData {
    /// Drops every store back to its unloaded state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
