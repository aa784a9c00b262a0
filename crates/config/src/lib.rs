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

pub mod global;
pub mod project;

/// The Pokémon Essentials release a project is built on.
///
/// The variant order matches release order, so `Ord` comparisons answer
/// "is this version at least X". `Unknown` sorts below every release and
/// never satisfies `is_at_least`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Deserialize, serde::Serialize)]
#[derive(strum::EnumIter, strum::Display)]
#[allow(missing_docs)]
pub enum EssentialsVersion {
    #[default]
    #[strum(to_string = "Unknown")]
    Unknown,
    #[strum(to_string = "v17")]
    V17,
    #[strum(to_string = "v17.1")]
    V17_1,
    #[strum(to_string = "v17.2")]
    V17_2,
    #[strum(to_string = "v18")]
    V18,
    #[strum(to_string = "v18.1")]
    V18_1,
    #[strum(to_string = "v19")]
    V19,
    #[strum(to_string = "v19.1")]
    V19_1,
    #[strum(to_string = "v20")]
    V20,
    #[strum(to_string = "v20.1")]
    V20_1,
    #[strum(to_string = "v21")]
    V21,
    #[strum(to_string = "v21.1")]
    V21_1,
}

impl EssentialsVersion {
    pub fn is_at_least(self, version: Self) -> bool {
        self >= version
    }

    /// v20 moved player metadata out of `metadata.txt` into its own PBS
    /// file and its own `player_metadata.dat`.
    pub fn splits_player_metadata(self) -> bool {
        self.is_at_least(Self::V20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering_matches_release_order() {
        assert!(EssentialsVersion::V19.is_at_least(EssentialsVersion::V18_1));
        assert!(EssentialsVersion::V21_1.is_at_least(EssentialsVersion::V21_1));
        assert!(!EssentialsVersion::V17.is_at_least(EssentialsVersion::V20));
    }

    #[test]
    fn unknown_is_never_at_least_a_release() {
        assert!(!EssentialsVersion::Unknown.is_at_least(EssentialsVersion::V17));
        assert!(!EssentialsVersion::Unknown.splits_player_metadata());
    }

    #[test]
    fn player_metadata_split_starts_at_v20() {
        assert!(!EssentialsVersion::V19_1.splits_player_metadata());
        assert!(EssentialsVersion::V20.splits_player_metadata());
        assert!(EssentialsVersion::V21.splits_player_metadata());
    }
}
