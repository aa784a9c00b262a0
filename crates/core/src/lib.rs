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

//! The Fluorite data pipeline.
//!
//! A load pass walks an ordered roster of data managers, each of which
//! reads one of the project's files (retrying while the game engine
//! holds it), decodes it through the marshal codec or the PBS parser,
//! and fills its store on [`fluorite_data::ProjectData`]. Progress and
//! cancellation flow through a [`LoadSession`] the embedding application
//! owns; errors classify into user-facing messages and cooperatively
//! abort the rest of the pass. Save passes run the same roster in the
//! other direction, but never abort: every kind gets its chance to reach
//! disk.

pub mod manager;
pub mod managers;
pub mod marshal;
pub mod retry;
pub mod session;

pub use manager::{
    ClassRegistry, DataKind, DataManager, DataManagerList, Descriptor, LoadContext, LoadOutcome,
    SaveOutcome,
};
pub use retry::{ErrorCause, FileError, Retry};
pub use session::{AbortHandle, LoadSession};

pub use alox_48;
