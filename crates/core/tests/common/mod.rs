#![allow(dead_code)]
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

//! Shared fixtures: an in-memory filesystem with fault injection, graph
//! builders and a canned scratch project.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use fluorite_filesystem::{FileSystem as _, Metadata, OpenFlags};

/// An in-memory filesystem for pipeline tests.
///
/// Besides plain storage it can simulate the failure the retry layer
/// exists for: a path can be "held by another process" for a number of
/// open attempts, and every open is counted so tests can assert how many
/// attempts a pass actually made.
#[derive(Clone, Default)]
pub struct MemFilesystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    files: HashMap<camino::Utf8PathBuf, Vec<u8>>,
    /// Opens left to reject per path. `u32::MAX` means locked forever.
    locked: HashMap<camino::Utf8PathBuf, u32>,
    opens: HashMap<camino::Utf8PathBuf, u32>,
}

impl MemFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the next `attempts` opens of `path` with the error of a
    /// file held by another process.
    pub fn lock_for(&self, path: impl AsRef<camino::Utf8Path>, attempts: u32) {
        self.inner
            .lock()
            .locked
            .insert(path.as_ref().to_path_buf(), attempts);
    }

    pub fn lock_forever(&self, path: impl AsRef<camino::Utf8Path>) {
        self.lock_for(path, u32::MAX);
    }

    pub fn open_count(&self, path: impl AsRef<camino::Utf8Path>) -> u32 {
        self.inner
            .lock()
            .opens
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }

    pub fn remove(&self, path: impl AsRef<camino::Utf8Path>) {
        self.inner.lock().files.remove(path.as_ref());
    }

    pub fn contents(&self, path: impl AsRef<camino::Utf8Path>) -> Option<Vec<u8>> {
        self.inner.lock().files.get(path.as_ref()).cloned()
    }
}

pub struct MemFile {
    path: camino::Utf8PathBuf,
    cursor: std::io::Cursor<Vec<u8>>,
    store: Arc<Mutex<Inner>>,
    writable: bool,
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.writable {
            self.store
                .lock()
                .files
                .insert(self.path.clone(), self.cursor.get_ref().clone());
        }
        Ok(())
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl fluorite_filesystem::File for MemFile {
    fn metadata(&self) -> std::io::Result<Metadata> {
        Ok(Metadata {
            is_file: true,
            size: self.cursor.get_ref().len() as u64,
        })
    }

    fn set_len(&self, _new_size: u64) -> std::io::Result<()> {
        Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
    }
}

impl fluorite_filesystem::FileSystem for MemFilesystem {
    type File = MemFile;

    fn open_file(
        &self,
        path: impl AsRef<camino::Utf8Path>,
        flags: OpenFlags,
    ) -> fluorite_filesystem::Result<Self::File> {
        let path = path.as_ref().to_path_buf();
        let mut inner = self.inner.lock();
        *inner.opens.entry(path.clone()).or_insert(0) += 1;

        if let Some(remaining) = inner.locked.get_mut(&path) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("{path} is held by another process"),
                )
                .into());
            }
        }

        let existing = inner.files.get(&path);
        let data = match existing {
            Some(data) if !flags.contains(OpenFlags::Truncate) => data.clone(),
            Some(_) => Vec::new(),
            None if flags.contains(OpenFlags::Create) => Vec::new(),
            None => {
                return Err(std::io::Error::from(std::io::ErrorKind::NotFound).into());
            }
        };
        if flags.contains(OpenFlags::Create) && existing.is_none() {
            inner.files.insert(path.clone(), Vec::new());
        }

        Ok(MemFile {
            path,
            cursor: std::io::Cursor::new(data),
            store: Arc::clone(&self.inner),
            writable: flags.contains(OpenFlags::Write),
        })
    }

    /// Stores the bytes directly so test setup does not disturb the
    /// open counter that [`MemFilesystem::open_count`] reports.
    fn write(
        &self,
        path: impl AsRef<camino::Utf8Path>,
        data: impl AsRef<[u8]>,
    ) -> fluorite_filesystem::Result<()> {
        self.inner
            .lock()
            .files
            .insert(path.as_ref().to_path_buf(), data.as_ref().to_vec());
        Ok(())
    }

    fn metadata(&self, path: impl AsRef<camino::Utf8Path>) -> fluorite_filesystem::Result<Metadata> {
        let inner = self.inner.lock();
        match inner.files.get(path.as_ref()) {
            Some(data) => Ok(Metadata {
                is_file: true,
                size: data.len() as u64,
            }),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
        }
    }

    fn rename(
        &self,
        from: impl AsRef<camino::Utf8Path>,
        to: impl AsRef<camino::Utf8Path>,
    ) -> fluorite_filesystem::Result<()> {
        let mut inner = self.inner.lock();
        match inner.files.remove(from.as_ref()) {
            Some(data) => {
                inner.files.insert(to.as_ref().to_path_buf(), data);
                Ok(())
            }
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
        }
    }

    fn exists(&self, path: impl AsRef<camino::Utf8Path>) -> fluorite_filesystem::Result<bool> {
        Ok(self.inner.lock().files.contains_key(path.as_ref()))
    }

    fn create_dir(&self, _path: impl AsRef<camino::Utf8Path>) -> fluorite_filesystem::Result<()> {
        // directories are implicit
        Ok(())
    }

    fn remove_dir(&self, path: impl AsRef<camino::Utf8Path>) -> fluorite_filesystem::Result<()> {
        let mut inner = self.inner.lock();
        inner
            .files
            .retain(|file, _| !file.starts_with(path.as_ref()));
        Ok(())
    }

    fn remove_file(&self, path: impl AsRef<camino::Utf8Path>) -> fluorite_filesystem::Result<()> {
        match self.inner.lock().files.remove(path.as_ref()) {
            Some(_) => Ok(()),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
        }
    }

    fn read_dir(
        &self,
        path: impl AsRef<camino::Utf8Path>,
    ) -> fluorite_filesystem::Result<Vec<fluorite_filesystem::DirEntry>> {
        let inner = self.inner.lock();
        Ok(inner
            .files
            .iter()
            .filter(|(file, _)| file.parent() == Some(path.as_ref()))
            .map(|(file, data)| {
                fluorite_filesystem::DirEntry::new(
                    file.clone(),
                    Metadata {
                        is_file: true,
                        size: data.len() as u64,
                    },
                )
            })
            .collect())
    }
}

// --- graph builders ---

pub fn object(class: &str, fields: Vec<(&str, alox_48::Value)>) -> alox_48::Value {
    let mut object = alox_48::Object {
        class: class.into(),
        fields: Default::default(),
    };
    for (name, value) in fields {
        object.fields.insert(format!("@{name}").as_str().into(), value);
    }
    alox_48::Value::Object(object)
}

pub fn hash(entries: Vec<(alox_48::Value, alox_48::Value)>) -> alox_48::Value {
    alox_48::Value::Hash(entries.into_iter().collect())
}

pub fn array(items: Vec<alox_48::Value>) -> alox_48::Value {
    alox_48::Value::Array(items.into_iter().collect())
}

pub fn int(n: i32) -> alox_48::Value {
    alox_48::Value::Integer(n)
}

pub fn sym(s: &str) -> alox_48::Value {
    alox_48::Value::Symbol(s.into())
}

pub fn string(s: &str) -> alox_48::Value {
    alox_48::Value::String(s.to_string().into())
}

pub fn write_marshal(
    fs: &impl fluorite_filesystem::FileSystem,
    path: &str,
    value: &alox_48::Value,
) {
    let data = fluorite_core::marshal::encode_data(value).unwrap();
    fs.write(path, data).unwrap();
}

// --- scratch project ---

fn tileset(id: i32, name: &str) -> alox_48::Value {
    object(
        "RPG::Tileset",
        vec![("id", int(id)), ("name", string(name)), ("panorama_hue", int(0))],
    )
}

fn named(class: &str, id: &str) -> alox_48::Value {
    object(class, vec![("id", sym(id))])
}

/// Writes a small but complete v20-style project: every file the
/// standard roster loads, with a couple of records each.
pub fn seed_project(fs: &impl fluorite_filesystem::FileSystem) {
    write_marshal(
        fs,
        "Data/Tilesets.rxdata",
        &array(vec![
            alox_48::Value::Nil,
            tileset(1, "Outdoor"),
            tileset(2, "Cave"),
        ]),
    );
    write_marshal(
        fs,
        "Data/MapInfos.rxdata",
        &array_to_info_hash(&[(1, "Pallet Town"), (2, "Viridian Forest")]),
    );
    write_marshal(
        fs,
        "Data/Map001.rxdata",
        &object("RPG::Map", vec![("tileset_id", int(1)), ("width", int(20))]),
    );
    write_marshal(
        fs,
        "Data/Map002.rxdata",
        &object("RPG::Map", vec![("tileset_id", int(2)), ("width", int(15))]),
    );
    write_marshal(
        fs,
        "Data/CommonEvents.rxdata",
        &array(vec![
            alox_48::Value::Nil,
            object(
                "RPG::CommonEvent",
                vec![("id", int(1)), ("name", string("Healing")), ("trigger", int(0))],
            ),
        ]),
    );
    write_marshal(
        fs,
        "Data/System.rxdata",
        &object(
            "RPG::System",
            vec![("magic_number", int(42)), ("title", string("Scratch Quest"))],
        ),
    );
    let scripts = vec![
        fluorite_data::rmxp::Script {
            id: 1,
            name: "Main".to_string(),
            script_text: "rgss_main { SceneManager.run }".to_string(),
        },
        fluorite_data::rmxp::Script {
            id: 2,
            name: "Game_Temp".to_string(),
            script_text: "class Game_Temp\nend\n".to_string(),
        },
    ];
    let data = fluorite_core::marshal::encode_data(&scripts).unwrap();
    fs.write("Data/Scripts.rxdata", data).unwrap();

    write_marshal(
        fs,
        "Data/metadata.dat",
        &hash(vec![(
            int(0),
            object("GameData::Metadata", vec![("id", int(0)), ("start_money", int(3000))]),
        )]),
    );
    write_marshal(
        fs,
        "Data/player_metadata.dat",
        &hash(vec![(
            int(1),
            object("GameData::PlayerMetadata", vec![("id", int(1))]),
        )]),
    );

    write_marshal(
        fs,
        "Data/species.dat",
        &hash(vec![
            (sym("BULBASAUR"), named("GameData::Species", "BULBASAUR")),
            (sym("IVYSAUR"), named("GameData::Species", "IVYSAUR")),
        ]),
    );
    write_marshal(
        fs,
        "Data/abilities.dat",
        &hash(vec![(sym("OVERGROW"), named("GameData::Ability", "OVERGROW"))]),
    );
    write_marshal(
        fs,
        "Data/items.dat",
        &hash(vec![(sym("POTION"), named("GameData::Item", "POTION"))]),
    );
    write_marshal(
        fs,
        "Data/moves.dat",
        &hash(vec![(sym("TACKLE"), named("GameData::Move", "TACKLE"))]),
    );
    write_marshal(
        fs,
        "Data/types.dat",
        &hash(vec![(sym("GRASS"), named("GameData::Type", "GRASS"))]),
    );
    write_marshal(
        fs,
        "Data/trainer_types.dat",
        &hash(vec![(
            sym("YOUNGSTER"),
            named("GameData::TrainerType", "YOUNGSTER"),
        )]),
    );
    write_marshal(
        fs,
        "Data/trainers.dat",
        &hash(vec![(
            array(vec![sym("YOUNGSTER"), string("Joey"), int(0)]),
            object(
                "GameData::Trainer",
                vec![
                    ("trainer_type", sym("YOUNGSTER")),
                    ("real_name", string("Joey")),
                ],
            ),
        )]),
    );
    write_marshal(
        fs,
        "Data/encounters.dat",
        &hash(vec![(
            array(vec![int(2), int(0)]),
            object(
                "GameData::Encounter",
                vec![("map", int(2)), ("version", int(0)), ("step_chances", hash(vec![]))],
            ),
        )]),
    );
}

fn array_to_info_hash(infos: &[(i32, &str)]) -> alox_48::Value {
    hash(
        infos
            .iter()
            .map(|&(id, name)| {
                (
                    int(id),
                    object("RPG::MapInfo", vec![("name", string(name)), ("order", int(id))]),
                )
            })
            .collect(),
    )
}

/// A v20-ready project config, matching what [`seed_project`] writes.
pub fn project_config() -> fluorite_config::project::Config {
    fluorite_config::project::Config::from_project(fluorite_config::project::Project {
        project_name: "Scratch Quest".to_string(),
        essentials_version: fluorite_config::EssentialsVersion::V20,
        ..Default::default()
    })
}
