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
use crate::File;
use crate::{Metadata, OpenFlags, Result};

/// Object-safe mirror of the file IO subset of [`crate::FileSystem`].
///
/// The data pipeline only ever opens, reads and writes files through its
/// filesystem seam; directory manipulation stays on the concrete types.
pub trait ErasedFilesystem: Send + Sync {
    fn open_file(&self, path: &camino::Utf8Path, flags: OpenFlags) -> Result<Box<dyn File>>;

    fn metadata(&self, path: &camino::Utf8Path) -> Result<Metadata>;

    fn exists(&self, path: &camino::Utf8Path) -> Result<bool>;

    fn read(&self, path: &camino::Utf8Path) -> Result<Vec<u8>>;

    fn read_to_string(&self, path: &camino::Utf8Path) -> Result<String>;

    fn write(&self, path: &camino::Utf8Path, data: &[u8]) -> Result<()>;
}

impl<T> ErasedFilesystem for T
where
    T: crate::FileSystem,
    T::File: 'static,
{
    fn open_file(&self, path: &camino::Utf8Path, flags: OpenFlags) -> Result<Box<dyn File>> {
        let file = self.open_file(path, flags)?;
        Ok(Box::new(file))
    }

    fn metadata(&self, path: &camino::Utf8Path) -> Result<Metadata> {
        self.metadata(path)
    }

    fn exists(&self, path: &camino::Utf8Path) -> Result<bool> {
        self.exists(path)
    }

    fn read(&self, path: &camino::Utf8Path) -> Result<Vec<u8>> {
        self.read(path)
    }

    fn read_to_string(&self, path: &camino::Utf8Path) -> Result<String> {
        self.read_to_string(path)
    }

    fn write(&self, path: &camino::Utf8Path, data: &[u8]) -> Result<()> {
        self.write(path, data)
    }
}

impl File for Box<dyn File> {
    fn metadata(&self) -> std::io::Result<Metadata> {
        self.as_ref().metadata()
    }

    fn set_len(&self, new_size: u64) -> std::io::Result<()> {
        self.as_ref().set_len(new_size)
    }
}

impl crate::FileSystem for dyn ErasedFilesystem {
    type File = Box<dyn File>;

    fn open_file(
        &self,
        path: impl AsRef<camino::Utf8Path>,
        flags: OpenFlags,
    ) -> Result<Self::File> {
        self.open_file(path.as_ref(), flags)
    }

    fn metadata(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Metadata> {
        self.metadata(path.as_ref())
    }

    fn rename(
        &self,
        _from: impl AsRef<camino::Utf8Path>,
        _to: impl AsRef<camino::Utf8Path>,
    ) -> Result<()> {
        Err(crate::Error::NotSupported.into())
    }

    fn exists(&self, path: impl AsRef<camino::Utf8Path>) -> Result<bool> {
        self.exists(path.as_ref())
    }

    fn create_dir(&self, _path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        Err(crate::Error::NotSupported.into())
    }

    fn remove_dir(&self, _path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        Err(crate::Error::NotSupported.into())
    }

    fn remove_file(&self, _path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        Err(crate::Error::NotSupported.into())
    }

    fn read_dir(&self, _path: impl AsRef<camino::Utf8Path>) -> Result<Vec<crate::DirEntry>> {
        Err(crate::Error::NotSupported.into())
    }

    fn read(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Vec<u8>> {
        self.read(path.as_ref())
    }

    fn read_to_string(&self, path: impl AsRef<camino::Utf8Path>) -> Result<String> {
        self.read_to_string(path.as_ref())
    }

    fn write(&self, path: impl AsRef<camino::Utf8Path>, data: impl AsRef<[u8]>) -> Result<()> {
        self.write(path.as_ref(), data.as_ref())
    }
}
