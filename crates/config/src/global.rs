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

use std::collections::VecDeque;

/// The state saved by Fluorite between sessions.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Recently open projects.
    pub recent_projects: VecDeque<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            recent_projects: VecDeque::new(),
        }
    }

    /// Moves (or inserts) a project path to the front of the recents
    /// list, keeping at most `max` entries.
    pub fn push_recent_project(&mut self, path: String, max: usize) {
        self.recent_projects.retain(|p| *p != path);
        self.recent_projects.push_front(path);
        self.recent_projects.truncate(max);
    }
}
