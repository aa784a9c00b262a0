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

use serde::{Deserialize, Serialize};

use super::EssentialsVersion;

#[derive(Debug, Clone)]
pub struct Config {
    pub project: Project,
    pub game_ini: ini::Ini,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
/// Local fluorite project config
#[allow(missing_docs)]
pub struct Project {
    pub project_name: String,
    pub scripts_path: String,
    pub essentials_version: EssentialsVersion,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            scripts_path: "Scripts".to_string(),
            essentials_version: EssentialsVersion::Unknown,
        }
    }
}

impl Config {
    pub fn from_project(project: Project) -> Self {
        let mut game_ini = ini::Ini::new();
        game_ini
            .with_section(Some("Game"))
            .set("Library", "RGSS104E.dll")
            .set("Scripts", format!("Data/{}.rxdata", project.scripts_path))
            .set("Title", &project.project_name)
            .set("RTP1", "")
            .set("RTP2", "")
            .set("RTP3", "");

        Self { project, game_ini }
    }
}
