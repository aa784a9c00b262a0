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

//! Pokémon Essentials `GameData` entities.

pub mod encounter;
pub mod metadata;
pub mod named;
pub mod trainer;

pub use encounter::{EncounterKey, EncounterTable};
pub use metadata::{Metadata, PlayerMetadata};
pub use named::{Ability, ElementalType, Item, Move, Species, TrainerType};
pub use trainer::Trainer;
