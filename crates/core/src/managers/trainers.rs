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

use fluorite_data::essentials::Trainer;

use crate::manager::{DataKind, DataManager, Descriptor, LoadContext};
use crate::retry::FileError;

/// Trainers are list-backed rather than id-keyed: the game allows two
/// battles against the same trainer type and name, distinguished only
/// by version, and keeps them in file order.
pub struct TrainerManager;

impl TrainerManager {
    const DESCRIPTOR: Descriptor = Descriptor {
        kind: DataKind::Trainers,
        class_name: Some(Trainer::CLASS),
        filename: "trainers.dat",
        pbs_filename: Some("trainers.txt"),
        message: "Trainers",
        from_pbs: false,
    };
}

/// Rebuilds the compiled `[type, name, version]` hash key from the
/// `TYPE,Name[,version]` id the record carries.
fn hash_key(trainer: &Trainer) -> alox_48::Value {
    let mut parts = trainer.id.splitn(3, ',');
    let trainer_type = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    let version = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0);

    alox_48::Value::Array(
        vec![
            alox_48::Value::Symbol(trainer_type.into()),
            alox_48::Value::String(name.to_string().into()),
            alox_48::Value::Integer(version),
        ]
        .into_iter()
        .collect(),
    )
}

impl DataManager for TrainerManager {
    fn descriptor(&self) -> &Descriptor {
        &Self::DESCRIPTOR
    }

    fn load_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR.data_path();
        let mut trainers = Vec::new();
        self.load_as_hash(
            ctx.filesystem,
            ctx.retry,
            ctx.session,
            &path,
            &mut |_key, value| {
                let trainer = Trainer::from_graph(value)
                    .map_err(|error| FileError::classified(&path, error.into()))?;
                trainers.push(trainer);
                Ok(())
            },
        )?;
        ctx.data.trainers = trainers;
        Ok(())
    }

    fn load_pbs(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let path = Self::DESCRIPTOR
            .pbs_path()
            .unwrap_or_else(|| Self::DESCRIPTOR.data_path());
        let mut trainers = Vec::new();
        self.parse_pbs(ctx.filesystem, ctx.session, &path, &mut |id, fields| {
            let Some(id) = id else {
                return Ok(());
            };
            trainers.push(Trainer::from_fields(id, fields));
            Ok(())
        })?;
        ctx.session.set_progress(1.0);
        ctx.data.trainers = trainers;
        Ok(())
    }

    fn save_native(&self, ctx: &mut LoadContext<'_, '_>) -> Result<(), FileError> {
        let entries = ctx
            .data
            .trainers
            .iter()
            .map(|trainer| (hash_key(trainer), trainer.to_graph()))
            .collect();
        self.save_as_hash(
            ctx.filesystem,
            ctx.retry,
            &Self::DESCRIPTOR.data_path(),
            entries,
        )
    }

    fn clear(&self, data: &mut fluorite_data::ProjectData) {
        data.trainers.clear();
    }
}
