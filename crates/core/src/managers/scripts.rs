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

use fluorite_data::rmxp::Script;

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::retry::FileError;

/// Loads and saves the RGSS script list.
///
/// The file name is configurable because Essentials projects rename it
/// when switching script loaders, so the descriptor's filename is only
/// the stock default.
pub struct ScriptManager;

impl ScriptManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Scripts,
        class_name: None,
        filename: "Scripts.rxdata",
        pbs_filename: None,
        message: "Scripts",
        from_pbs: false,
    };

    fn scripts_path(config: &fluorite_config::project::Config) -> camino::Utf8PathBuf {
        camino::Utf8PathBuf::from("Data").join(format!("{}.rxdata", config.project.scripts_path))
    }
}

impl DataManager for ScriptManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::scripts_path(ctx.config);
        let mut scripts = Vec::new();
        self.load_as_array(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            false,
            &mut |item| {
                let script: Script = alox_48::from_value(&item)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                scripts.push(script);
                Ok(())
            },
        )?;
        ctx.data.scripts = scripts;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        crate::marshal::write_data(
            ctx.filesystem,
            ctx.retry,
            &Self::scripts_path(ctx.config),
            &ctx.data.scripts,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.scripts.clear();
    }
}
