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

//! The Ruby Marshal codec behind a byte-slice interface.
//!
//! Everything the pipeline knows about the wire format lives here: the
//! managers deal in [`alox_48::Value`] graphs (or typed values with their
//! own `Deserialize`/`Serialize` impls, like scripts) and byte buffers
//! moved through [`crate::retry`].

use fluorite_filesystem::erased::ErasedFilesystem;

use crate::retry::{self, FileError, Retry};

/// Folds an `alox_48` error trace into the report as context, keeping
/// the original error as the root so it stays classifiable.
pub fn format_traced_error(
    error: impl Into<color_eyre::Report>,
    trace: alox_48::path_to_error::Trace,
) -> color_eyre::Report {
    let mut error = error.into();
    for context in trace.context {
        error = error.wrap_err(context);
    }
    error
}

/// Decodes one marshal stream into an untyped value graph.
pub fn decode_value(data: &[u8]) -> color_eyre::Result<alox_48::Value> {
    let mut de = alox_48::Deserializer::new(data)?;
    let value = de.deserialize_value()?;
    Ok(value)
}

/// Decodes one marshal stream into a typed value, tracing the path to
/// any element that fails.
pub fn decode_data<T>(data: &[u8]) -> color_eyre::Result<T>
where
    T: for<'de> alox_48::Deserialize<'de>,
{
    let mut de = alox_48::Deserializer::new(data)?;
    let result = alox_48::path_to_error::deserialize(&mut de);

    result.map_err(|(error, trace)| format_traced_error(error, trace))
}

/// Encodes a value into a marshal stream.
pub fn encode_data(data: &impl alox_48::Serialize) -> color_eyre::Result<Vec<u8>> {
    let mut serializer = alox_48::Serializer::new();
    alox_48::path_to_error::serialize(data, &mut serializer)
        .map_err(|(error, trace)| format_traced_error(error, trace))?;

    Ok(serializer.output)
}

/// Reads and decodes a whole data file. The read retries on contention;
/// decode failures classify without retrying.
pub fn read_value(
    filesystem: &dyn ErasedFilesystem,
    retry: Retry,
    path: &camino::Utf8Path,
) -> Result<alox_48::Value, FileError> {
    let data = retry::read_file(filesystem, retry, path)?;
    decode_value(&data).map_err(|report| FileError::classified(path, report))
}

pub fn read_data<T>(
    filesystem: &dyn ErasedFilesystem,
    retry: Retry,
    path: &camino::Utf8Path,
) -> Result<T, FileError>
where
    T: for<'de> alox_48::Deserialize<'de>,
{
    let data = retry::read_file(filesystem, retry, path)?;
    decode_data(&data).map_err(|report| FileError::classified(path, report))
}

/// Encodes and writes a whole data file through the retrying writer.
pub fn write_data(
    filesystem: &dyn ErasedFilesystem,
    retry: Retry,
    path: &camino::Utf8Path,
    data: &impl alox_48::Serialize,
) -> Result<(), FileError> {
    let encoded = encode_data(data).map_err(|report| FileError::classified(path, report))?;
    retry::write_file(filesystem, retry, path, &encoded)
}
