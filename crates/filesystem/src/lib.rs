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

pub mod erased;
pub mod host;
pub mod project;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Io error {0}")]
    IoError(#[from] std::io::Error),
    #[error("UTF-8 Error {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Project not loaded")]
    NotLoaded,
    #[error("Operation not supported by this filesystem")]
    NotSupported,
    #[error("Invalid project folder (no .rxproj or .mkproj file present)")]
    InvalidProjectFolder,
}

pub use color_eyre::Result;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Metadata {
    pub is_file: bool,
    pub size: u64,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DirEntry {
    pub path: camino::Utf8PathBuf,
    pub metadata: Metadata,
}

impl DirEntry {
    pub fn new(path: camino::Utf8PathBuf, metadata: Metadata) -> Self {
        Self { path, metadata }
    }

    pub fn path(&self) -> &camino::Utf8Path {
        &self.path
    }

    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .expect("path created through DirEntry must have a filename")
    }

    pub fn into_path(self) -> camino::Utf8PathBuf {
        self.path
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u8 {
        const Read = 0b00000001;
        const Write = 0b00000010;
        const Truncate = 0b00000100;
        const Create = 0b00001000;
    }
}

pub trait File: std::io::Read + std::io::Write + std::io::Seek + Send + Sync {
    fn metadata(&self) -> std::io::Result<Metadata>;

    /// Truncates or extends the size of the file. If the file is extended, the file will be
    /// null-padded at the end. The file cursor never changes when truncating or extending, even if
    /// the cursor would be put outside the file bounds by this operation.
    fn set_len(&self, new_size: u64) -> std::io::Result<()>;
}

impl<T> File for &mut T
where
    T: File + ?Sized,
{
    fn metadata(&self) -> std::io::Result<Metadata> {
        (**self).metadata()
    }

    fn set_len(&self, new_size: u64) -> std::io::Result<()> {
        (**self).set_len(new_size)
    }
}

pub trait FileSystem: Send + Sync {
    type File: File;

    fn open_file(&self, path: impl AsRef<camino::Utf8Path>, flags: OpenFlags)
        -> Result<Self::File>;

    fn create_file(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Self::File> {
        self.open_file(path, OpenFlags::Create | OpenFlags::Write)
    }

    fn metadata(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Metadata>;

    fn rename(
        &self,
        from: impl AsRef<camino::Utf8Path>,
        to: impl AsRef<camino::Utf8Path>,
    ) -> Result<()>;

    fn exists(&self, path: impl AsRef<camino::Utf8Path>) -> Result<bool>;

    fn create_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()>;

    fn remove_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()>;

    fn remove_file(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()>;

    fn remove(&self, path: impl AsRef<camino::Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        let metadata = self.metadata(path)?;
        if metadata.is_file {
            self.remove_file(path)
        } else {
            self.remove_dir(path)
        }
    }

    fn read_dir(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Vec<DirEntry>>;

    /// Corresponds to [`std::fs::read()`].
    /// Will open a file at the path and read the entire file into a buffer.
    fn read(&self, path: impl AsRef<camino::Utf8Path>) -> Result<Vec<u8>> {
        use std::io::Read;

        let path = path.as_ref();

        let mut buf = Vec::with_capacity(self.metadata(path)?.size as usize);
        let mut file = self.open_file(path, OpenFlags::Read)?;
        file.read_to_end(&mut buf)?;

        Ok(buf)
    }

    fn read_to_string(&self, path: impl AsRef<camino::Utf8Path>) -> Result<String> {
        let buf = self.read(path)?;
        String::from_utf8(buf).map_err(Into::into)
    }

    /// Corresponds to [`std::fs::write()`].
    /// Will open a file at the path, create it if it exists (and truncate it) and then write the provided bytes.
    fn write(&self, path: impl AsRef<camino::Utf8Path>, data: impl AsRef<[u8]>) -> Result<()> {
        use std::io::Write;

        let mut file = self.open_file(
            path,
            OpenFlags::Write | OpenFlags::Truncate | OpenFlags::Create,
        )?;
        file.write_all(data.as_ref())?;
        file.flush()?;

        Ok(())
    }
}
