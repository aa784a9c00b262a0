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

//! The data manager contract and the orchestrator that drives it.
//!
//! Each entity kind gets one [`DataManager`]: a descriptor naming its
//! files, a native (marshal) load/save, optionally a PBS load, and a
//! clear. The [`DataManagerList`] runs every manager in a fixed order as
//! one pass, with progress, cooperative cancellation and per-file error
//! reporting on the shared [`LoadSession`].

use std::ops::ControlFlow;

use fluorite_data::{graph, ProjectData};
use fluorite_filesystem::erased::ErasedFilesystem;
use fluorite_filesystem::OpenFlags;

use crate::managers;
use crate::marshal;
use crate::retry::{ErrorCause, FileError, Retry};
use crate::session::{fraction, LoadSession};

/// Identifies an entity kind's manager within a list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[derive(strum::Display, strum::EnumIter)]
pub enum DataKind {
    Scripts,
    Tilesets,
    Maps,
    CommonEvents,
    System,
    Metadata,
    PlayerMetadata,
    Species,
    Abilities,
    Items,
    Moves,
    Types,
    TrainerTypes,
    Trainers,
    Encounters,
}

/// The immutable identity of one manager.
#[derive(Clone, Copy, Debug)]
pub struct Descriptor {
    pub kind: DataKind,
    /// Marshal class of this kind's records, when it has one.
    pub class_name: Option<&'static str>,
    /// Native data file, relative to `Data/`.
    pub filename: &'static str,
    /// PBS source file, relative to `PBS/`, for PBS-capable kinds.
    pub pbs_filename: Option<&'static str>,
    /// Human readable name used in "Loading {}..." status lines.
    pub message: &'static str,
    /// Forces the PBS source even when the pass does not request it.
    pub from_pbs: bool,
}

impl Descriptor {
    pub fn data_path(&self) -> camino::Utf8PathBuf {
        camino::Utf8PathBuf::from("Data").join(self.filename)
    }

    pub fn pbs_path(&self) -> Option<camino::Utf8PathBuf> {
        self.pbs_filename
            .map(|filename| camino::Utf8PathBuf::from("PBS").join(filename))
    }
}

/// The marshal classes the managers have registered.
///
/// Registration is idempotent: the first manager to claim a class keeps
/// it, repeats are no-ops.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: indexmap::IndexMap<&'static str, DataKind>,
}

impl ClassRegistry {
    /// Returns whether the class was newly registered.
    pub fn define(&mut self, class: &'static str, kind: DataKind) -> bool {
        if self.classes.contains_key(class) {
            return false;
        }
        self.classes.insert(class, kind);
        true
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn kind_of(&self, class: &str) -> Option<DataKind> {
        self.classes.get(class).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Everything a load or save pass works against. Owned by the caller
/// for the duration of the pass; there is no global state behind it.
pub struct LoadContext<'a, 'cb> {
    pub filesystem: &'a dyn ErasedFilesystem,
    pub config: &'a mut fluorite_config::project::Config,
    pub data: &'a mut ProjectData,
    pub session: &'a mut LoadSession<'cb>,
    pub retry: Retry,
}

pub trait DataManager {
    fn descriptor(&self) -> &Descriptor;

    fn kind(&self) -> DataKind {
        self.descriptor().kind
    }

    /// Registers this kind's marshal class. Safe to call repeatedly.
    fn init_class(&self, registry: &mut ClassRegistry) {
        if let Some(class) = self.descriptor().class_name {
            registry.define(class, self.kind());
        }
    }

    /// Publishes the status line, dispatches to the PBS or native
    /// loader, and turns any failure into a session problem plus the
    /// cooperative abort flag.
    fn load(&self, ctx: &mut LoadContext<'_, '_>, from_pbs: bool) {
        let descriptor = self.descriptor();
        ctx.session
            .set_text(&format!("Loading {}...", descriptor.message));

        let result = if (from_pbs || descriptor.from_pbs) && descriptor.pbs_filename.is_some() {
            self.load_pbs(ctx)
        } else {
            self.load_native(ctx)
        };

        if let Err(error) = result {
            let message = error.to_load_message();
            tracing::error!("{message}");
            ctx.session.push_problem(message);
            ctx.session.abort();
        }
    }

    /// Saves natively. Failures become session problems but never touch
    /// the abort flag: every other manager still gets to save.
    fn save(&self, ctx: &mut LoadContext<'_, '_>) {
        if let Err(error) = self.save_native(ctx) {
            let message = error.to_save_message();
            tracing::error!("{message}");
            ctx.session.push_problem(message);
        }
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let _ = ctx;
        Ok(())
    }

    fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let _ = ctx;
        let descriptor = self.descriptor();
        let path = descriptor.pbs_path().unwrap_or_else(|| descriptor.data_path());
        Err(FileError::other(
            &path,
            color_eyre::eyre::eyre!(
                "the {} manager declares a PBS source but does not implement loading it",
                descriptor.message
            ),
        ))
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let _ = ctx;
        Ok(())
    }

    fn clear(&self, data: &mut ProjectData) {
        let _ = data;
    }

    /// Decodes the file at `path` as a hash and feeds its entries to
    /// `on_item` in graph order, reporting progress after each and
    /// breaking out (without error) once the session is cancelled.
    fn load_as_hash(
        &self,
        filesystem: &dyn ErasedFilesystem,
        retry: Retry,
        session: &mut LoadSession<'_>,
        path: &camino::Utf8Path,
        on_item: &mut dyn FnMut(alox_48::Value, alox_48::Value) -> Result<(), FileError>,
    ) -> Result<(), FileError> {
        let value = marshal::read_value(filesystem, retry, path)?;
        let pairs =
            graph::into_pairs(value).map_err(|error| FileError::classified(path, error.into()))?;
        let count = pairs.len();
        if count == 0 {
            // no iteration to report from; the bar still has to land
            session.set_progress(1.0);
        }
        for (index, (key, item)) in pairs.into_iter().enumerate() {
            on_item(key, item)?;
            session.set_progress(fraction(index, count));
            if session.stopped() {
                break;
            }
        }
        Ok(())
    }

    /// Array counterpart of [`Self::load_as_hash`]. `start_at_1` skips
    /// the nil sentinel RMXP keeps in slot 0; progress still uses the
    /// raw slot index, as the original loaders did.
    fn load_as_array(
        &self,
        filesystem: &dyn ErasedFilesystem,
        retry: Retry,
        session: &mut LoadSession<'_>,
        path: &camino::Utf8Path,
        start_at_1: bool,
        on_item: &mut dyn FnMut(alox_48::Value) -> Result<(), FileError>,
    ) -> Result<(), FileError> {
        let value = marshal::read_value(filesystem, retry, path)?;
        let items =
            graph::into_items(value).map_err(|error| FileError::classified(path, error.into()))?;
        let count = items.len();
        if count <= usize::from(start_at_1) {
            // empty, or nothing past the nil sentinel
            session.set_progress(1.0);
        }
        for (index, item) in items.into_iter().enumerate().skip(usize::from(start_at_1)) {
            on_item(item)?;
            session.set_progress(fraction(index, count));
            if session.stopped() {
                break;
            }
        }
        Ok(())
    }

    fn save_as_hash(
        &self,
        filesystem: &dyn ErasedFilesystem,
        retry: Retry,
        path: &camino::Utf8Path,
        entries: Vec<(alox_48::Value, alox_48::Value)>,
    ) -> Result<(), FileError> {
        let value = alox_48::Value::Hash(entries.into_iter().collect());
        marshal::write_data(filesystem, retry, path, &value)
    }

    fn save_as_array(
        &self,
        filesystem: &dyn ErasedFilesystem,
        retry: Retry,
        path: &camino::Utf8Path,
        start_at_1: bool,
        items: Vec<alox_48::Value>,
    ) -> Result<(), FileError> {
        let mut padded = Vec::with_capacity(items.len() + usize::from(start_at_1));
        if start_at_1 {
            padded.push(alox_48::Value::Nil);
        }
        padded.extend(items);
        let value = alox_48::Value::Array(padded.into_iter().collect());
        marshal::write_data(filesystem, retry, path, &value)
    }

    /// Parses a PBS source, feeding each section to `on_section` and
    /// stopping early at cancellation or the first section error.
    fn parse_pbs(
        &self,
        filesystem: &dyn ErasedFilesystem,
        session: &LoadSession<'_>,
        path: &camino::Utf8Path,
        on_section: &mut dyn FnMut(
            Option<&str>,
            fluorite_pbs::SectionFields,
        ) -> Result<(), FileError>,
    ) -> Result<(), FileError> {
        let mut failure = None;
        let parsed = fluorite_pbs::parse_file(filesystem, path, |id, fields| {
            if session.stopped() {
                return ControlFlow::Break(());
            }
            match on_section(id, fields) {
                Ok(()) => ControlFlow::Continue(()),
                Err(error) => {
                    failure = Some(error);
                    ControlFlow::Break(())
                }
            }
        });
        if let Some(error) = failure {
            return Err(error);
        }
        parsed.map_err(|error| match error {
            fluorite_pbs::Error::NotFound(missing) => FileError {
                path: missing,
                cause: ErrorCause::NotFound,
            },
            fluorite_pbs::Error::Filesystem(report) => FileError::classified(path, report),
        })
    }
}

/// The result of one load pass.
#[must_use]
#[derive(Debug)]
pub struct LoadOutcome {
    pub aborted: bool,
    pub problems: Vec<String>,
}

impl LoadOutcome {
    pub fn is_ok(&self) -> bool {
        !self.aborted && self.problems.is_empty()
    }
}

/// The result of one save pass. Saves never abort, so the only signal
/// is the problem list.
#[must_use]
#[derive(Debug)]
pub struct SaveOutcome {
    pub problems: Vec<String>,
}

impl SaveOutcome {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// An ordered list of managers driven as one unit.
pub struct DataManagerList {
    managers: Vec<Box<dyn DataManager>>,
    registry: ClassRegistry,
    initialized: bool,
}

impl DataManagerList {
    /// Builds a list, checking the two inter-manager ordering rules:
    /// tilesets load before maps (maps refer to tilesets by id), and
    /// metadata loads before player metadata (the metadata pass may
    /// already have provided the player records). Violations panic, as
    /// a mis-ordered roster is a programming error.
    pub fn new(managers: Vec<Box<dyn DataManager>>) -> Self {
        let index_of =
            |kind: DataKind| managers.iter().position(|manager| manager.kind() == kind);

        if let (Some(tilesets), Some(maps)) =
            (index_of(DataKind::Tilesets), index_of(DataKind::Maps))
        {
            assert!(
                tilesets < maps,
                "TilesetManager must occur before MapManager"
            );
        }
        if let (Some(metadata), Some(player)) = (
            index_of(DataKind::Metadata),
            index_of(DataKind::PlayerMetadata),
        ) {
            assert!(
                metadata < player,
                "MetadataManager must occur before PlayerMetadataManager"
            );
        }

        Self {
            managers,
            registry: ClassRegistry::default(),
            initialized: false,
        }
    }

    /// The full roster in its canonical order.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(managers::ScriptManager),
            Box::new(managers::TilesetManager),
            Box::new(managers::MapManager),
            Box::new(managers::CommonEventManager),
            Box::new(managers::SystemManager),
            Box::new(managers::MetadataManager),
            Box::new(managers::PlayerMetadataManager),
            Box::new(managers::SpeciesManager),
            Box::new(managers::AbilityManager),
            Box::new(managers::ItemManager),
            Box::new(managers::MoveManager),
            Box::new(managers::TypeManager),
            Box::new(managers::TrainerTypeManager),
            Box::new(managers::TrainerManager),
            Box::new(managers::EncounterManager),
        ])
    }

    /// Registers every manager's marshal class. Runs once before any
    /// load; running it twice is a programming error.
    pub fn setup(&mut self) {
        assert!(!self.initialized, "data managers were already set up");
        for manager in &self.managers {
            manager.init_class(&mut self.registry);
        }
        self.initialized = true;
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Runs every manager's load in order. A manager failure sets the
    /// session's abort flag, which stops the pass before the next
    /// manager; the failure itself was already reported there.
    pub fn load(&self, ctx: &mut LoadContext<'_, '_>, from_pbs: bool) -> LoadOutcome {
        assert!(self.initialized, "setup must run before load");
        ctx.session.reset();

        for manager in &self.managers {
            if ctx.session.stopped() {
                break;
            }
            manager.load(ctx, from_pbs);
        }

        let aborted = ctx.session.stopped();
        if !aborted {
            ctx.session.set_text("Loading project...");
            ctx.session.set_progress(1.0);
        }
        LoadOutcome {
            aborted,
            problems: ctx.session.take_problems(),
        }
    }

    /// Runs every manager's save unconditionally, then persists the
    /// project configuration. Failures accumulate; nothing stops the
    /// pass.
    pub fn save(&self, ctx: &mut LoadContext<'_, '_>) -> SaveOutcome {
        ctx.session.reset();

        for manager in &self.managers {
            manager.save(ctx);
        }
        self.save_configuration(ctx);

        SaveOutcome {
            problems: ctx.session.take_problems(),
        }
    }

    pub fn clear(&self, data: &mut ProjectData) {
        for manager in &self.managers {
            manager.clear(data);
        }
    }

    fn save_configuration(&self, ctx: &mut LoadContext<'_, '_>) {
        let path = camino::Utf8Path::new(".fluorite/config");
        if let Err(report) = write_project_config(ctx.filesystem, ctx.config) {
            let message = FileError::classified(path, report).to_save_message();
            tracing::error!("{message}");
            ctx.session.push_problem(message);
        }

        let path = camino::Utf8Path::new("Game.ini");
        if let Err(report) = write_game_ini(ctx.filesystem, ctx.config) {
            let message = FileError::classified(path, report).to_save_message();
            tracing::error!("{message}");
            ctx.session.push_problem(message);
        }
    }
}

fn write_project_config(
    filesystem: &dyn ErasedFilesystem,
    config: &fluorite_config::project::Config,
) -> color_eyre::Result<()> {
    use color_eyre::eyre::WrapErr;

    let pretty_config = ron::ser::PrettyConfig::new()
        .struct_names(true)
        .enumerate_arrays(true);

    let contents = ron::ser::to_string_pretty(&config.project, pretty_config)
        .wrap_err("While serializing .fluorite/config")?;
    filesystem.write(camino::Utf8Path::new(".fluorite/config"), contents.as_bytes())
}

fn write_game_ini(
    filesystem: &dyn ErasedFilesystem,
    config: &fluorite_config::project::Config,
) -> color_eyre::Result<()> {
    use color_eyre::eyre::WrapErr;

    // Ini writes through fmt internally but offers no string output, so
    // it gets an open file instead.
    let mut file = filesystem
        .open_file(
            camino::Utf8Path::new("Game.ini"),
            OpenFlags::Create | OpenFlags::Write | OpenFlags::Truncate,
        )
        .wrap_err("While opening Game.ini")?;
    config
        .game_ini
        .write_to(&mut file)
        .wrap_err("While serializing Game.ini")?;
    Ok(())
}
