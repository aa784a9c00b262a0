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

//! Parser for the PBS text files Pokémon Essentials compiles its game
//! data from (`pokemon.txt`, `moves.txt`, `encounters.txt` and friends).
//!
//! PBS files are an INI-like format with repeated `[section]` headers
//! and `key = value` lines, but differ from INI in enough ways (comment
//! syntax, duplicate sections, comma-separated ids, significant order)
//! that they get their own parser.

use std::ops::ControlFlow;

use fluorite_filesystem::erased::ErasedFilesystem;

/// The key/value lines of one section, in file order.
pub type SectionFields = indexmap::IndexMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("PBS file {0} does not exist")]
    NotFound(camino::Utf8PathBuf),
    #[error("{0}")]
    Filesystem(color_eyre::Report),
}

impl From<color_eyre::Report> for Error {
    fn from(report: color_eyre::Report) -> Self {
        Self::Filesystem(report)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reads `path` through the filesystem and parses it with [`parse_str`].
///
/// Fails with [`Error::NotFound`] when the file does not exist. PBS
/// sources are plain text the game engine never holds open, so there is
/// no retry here, unlike the marshal data files.
pub fn parse_file(
    filesystem: &dyn ErasedFilesystem,
    path: &camino::Utf8Path,
    on_section: impl FnMut(Option<&str>, SectionFields) -> ControlFlow<()>,
) -> Result<()> {
    if !filesystem.exists(path)? {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let contents = filesystem.read_to_string(path)?;
    parse_str(&contents, on_section);
    Ok(())
}

/// Parses section-based PBS text, invoking `on_section` once per
/// section with its id and accumulated fields.
///
/// Line handling, after trimming surrounding whitespace:
/// - blank lines and `#` comments are skipped
/// - `[id]` closes the section being accumulated (invoking the
///   callback) and opens a new one
/// - lines with an `=` are split on the *first* `=` into a trimmed
///   key and value; within one section a repeated key overwrites the
///   earlier value
/// - anything else is ignored
///
/// The callback always fires at least once: end of input flushes the
/// open section, and a file with no headers at all produces a single
/// `None`-id section. Fields found before the first header of a
/// sectioned file are also flushed under a `None` id, so callers must
/// treat `None` as file-global data. Returning [`ControlFlow::Break`]
/// stops the parse early.
pub fn parse_str(
    contents: &str,
    mut on_section: impl FnMut(Option<&str>, SectionFields) -> ControlFlow<()>,
) {
    let mut current_id: Option<String> = None;
    let mut fields = SectionFields::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(id) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if current_id.is_some() || !fields.is_empty() {
                let flushed = std::mem::take(&mut fields);
                if on_section(current_id.as_deref(), flushed).is_break() {
                    return;
                }
            }
            current_id = Some(id.to_string());
        } else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            if let Some(previous) = fields.insert(key.clone(), value) {
                tracing::debug!(
                    "duplicate PBS key {key:?} in section {current_id:?} replaces {previous:?}"
                );
            }
        }
    }

    on_section(current_id.as_deref(), fields);
}
