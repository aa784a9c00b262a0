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

use color_eyre::eyre::WrapErr;

use crate::FileSystem as _;
use crate::{host, DirEntry, Error, Metadata, OpenFlags, Result};

/// How many projects the recent-projects list remembers.
const RECENT_PROJECTS: usize = 10;

#[derive(Default)]
pub enum FileSystem {
    #[default]
    Unloaded,
    Loaded {
        filesystem: host::FileSystem,
    },
}

impl FileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_path(&self) -> Option<camino::Utf8PathBuf> {
        match self {
            FileSystem::Unloaded => None,
            FileSystem::Loaded { filesystem } => Some(filesystem.root_path().to_path_buf()),
        }
    }

    pub fn project_loaded(&self) -> bool {
        !matches!(self, FileSystem::Unloaded)
    }

    pub fn unload_project(&mut self) {
        *self = FileSystem::Unloaded;
    }

    pub fn host(&self) -> Option<host::FileSystem> {
        match self {
            FileSystem::Unloaded => None,
            FileSystem::Loaded { filesystem } => Some(filesystem.clone()),
        }
    }

    pub fn load_project_from_path(
        &mut self,
        project_config: &mut Option<fluorite_config::project::Config>,
        global_config: &mut fluorite_config::global::Config,
        project_path: impl AsRef<camino::Utf8Path>,
    ) -> Result<()> {
        let host = host::FileSystem::new(project_path);
        self.load_project(host, project_config, global_config)
    }

    /// Mounts `host` as the current project and loads (or creates) its
    /// configuration. The directory must contain an RPG Maker XP or
    /// RPG Studio MK project file.
    pub fn load_project(
        &mut self,
        host: host::FileSystem,
        project_config: &mut Option<fluorite_config::project::Config>,
        global_config: &mut fluorite_config::global::Config,
    ) -> Result<()> {
        let c = "While loading project data";

        let entries = host.read_dir("").wrap_err(c)?;
        if !entries.iter().any(|e| {
            e.metadata.is_file && matches!(e.path.extension(), Some("rxproj" | "mkproj"))
        }) {
            return Err(Error::InvalidProjectFolder).wrap_err(c);
        }

        let project_path = host.root_path().to_path_buf();
        tracing::info!("opening project at {project_path}");

        *self = FileSystem::Loaded { filesystem: host };
        let config = match self.load_project_config().wrap_err(c) {
            Ok(config) => config,
            Err(e) => {
                *self = FileSystem::Unloaded;
                return Err(e);
            }
        };

        global_config.push_recent_project(project_path.into_string(), RECENT_PROJECTS);
        *project_config = Some(config);

        Ok(())
    }

    /// Best-effort guess at the Essentials release from the data files
    /// present. Overridable through the project config.
    fn detect_essentials_version(&self) -> fluorite_config::EssentialsVersion {
        use fluorite_config::EssentialsVersion;

        // player_metadata.dat split out in v20, map_metadata.dat in v19.
        if self.exists("Data/player_metadata.dat").unwrap_or(false) {
            EssentialsVersion::V20
        } else if self.exists("Data/map_metadata.dat").unwrap_or(false) {
            EssentialsVersion::V19
        } else if self.exists("Data/species.dat").unwrap_or(false) {
            EssentialsVersion::V18
        } else {
            EssentialsVersion::Unknown
        }
    }

    fn load_project_config(&self) -> Result<fluorite_config::project::Config> {
        let c = "While loading project configuration";
        self.create_dir(".fluorite").wrap_err(c)?;

        let game_ini = match self
            .read_to_string("Game.ini")
            .ok()
            .and_then(|i| ini::Ini::load_from_str_noescape(&i).ok())
        {
            Some(i) => i,
            None => {
                let mut ini = ini::Ini::new();
                ini.with_section(Some("Game"))
                    .set("Library", "RGSS104E.dll")
                    .set("Scripts", "Data/Scripts.rxdata")
                    .set("Title", "")
                    .set("RTP1", "")
                    .set("RTP2", "")
                    .set("RTP3", "");

                let mut file = self.open_file(
                    "Game.ini",
                    OpenFlags::Write | OpenFlags::Create | OpenFlags::Truncate,
                )?;
                ini.write_to(&mut file)?;

                ini
            }
        };

        let pretty_config = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(true);

        let project = match self
            .read_to_string(".fluorite/config")
            .ok()
            .and_then(|s| ron::from_str::<fluorite_config::project::Project>(&s).ok())
        {
            Some(config)
                if config.essentials_version != fluorite_config::EssentialsVersion::Unknown =>
            {
                config
            }
            Some(mut config) => {
                config.essentials_version = self.detect_essentials_version();
                tracing::info!(
                    "detected Essentials {} from the project's data files",
                    config.essentials_version
                );
                self.write(
                    ".fluorite/config",
                    ron::ser::to_string_pretty(&config, pretty_config.clone()).wrap_err(c)?,
                )
                .wrap_err(c)?;
                config
            }
            None => {
                let essentials_version = self.detect_essentials_version();
                tracing::info!(
                    "detected Essentials {essentials_version} from the project's data files"
                );
                let project_name = game_ini
                    .section(Some("Game"))
                    .and_then(|s| s.get("Title"))
                    .filter(|t| !t.is_empty())
                    .unwrap_or("Untitled Project")
                    .to_string();
                let config = fluorite_config::project::Project {
                    essentials_version,
                    project_name,
                    ..Default::default()
                };
                self.write(
                    ".fluorite/config",
                    ron::ser::to_string_pretty(&config, pretty_config.clone()).wrap_err(c)?,
                )
                .wrap_err(c)?;
                config
            }
        };

        Ok(fluorite_config::project::Config { project, game_ini })
    }
}

impl crate::FileSystem for FileSystem {
    type File = std::fs::File;

    fn open_file(
        &self,
        path: impl AsRef<camino::Utf8Path>,
        flags: OpenFlags,
    ) -> Result<Self::File> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.open_file(path, flags),
        }
    }

    fn metadata(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Metadata> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.metadata(path),
        }
    }

    fn rename(
        &self,
        from: impl AsRef<camino::Utf8Path>,
        to: impl AsRef<camino::Utf8Path>,
    ) -> Result<()> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.rename(from, to),
        }
    }

    fn exists(&self, path: impl AsRef<camino::Utf8Path>) -> Result<bool> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.exists(path),
        }
    }

    fn create_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.create_dir(path),
        }
    }

    fn remove_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.remove_dir(path),
        }
    }

    fn remove_file(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.remove_file(path),
        }
    }

    fn read_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Vec<DirEntry>> {
        match self {
            FileSystem::Unloaded => Err(Error::NotLoaded.into()),
            FileSystem::Loaded { filesystem } => filesystem.read_dir(path),
        }
    }
}
