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

//! Whole-pipeline tests over a scratch project.

mod common;

use std::cell::RefCell;
use std::time::Duration;

use fluorite_core::managers::{EncounterManager, TilesetManager};
use fluorite_core::{DataManagerList, LoadContext, LoadSession, Retry};
use fluorite_data::{ProjectData, Record};
use fluorite_filesystem::FileSystem as _;

use common::MemFilesystem;

fn test_retry() -> Retry {
    Retry {
        tries: 3,
        delay: Duration::from_millis(1),
    }
}

fn roster() -> DataManagerList {
    let mut list = DataManagerList::standard();
    list.setup();
    list
}

#[test]
fn a_native_load_fills_every_store() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();

    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert_eq!(data.scripts.len(), 2);
    assert_eq!(data.scripts[0].name, "Main");
    assert_eq!(
        data.tilesets.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(data.map_infos[&1].name, "Pallet Town");
    assert_eq!(data.maps[&2].tileset_id(), Some(2));
    assert_eq!(data.common_events.len(), 1);
    assert_eq!(data.system.as_ref().unwrap().magic_number(), Some(42));
    assert!(data.metadata.is_some());
    assert!(!data.player_metadata_preloaded);
    assert_eq!(data.player_metadata[&1].id, 1);
    assert!(data.species.contains_key("BULBASAUR"));
    assert!(data.abilities.contains_key("OVERGROW"));
    assert!(data.items.contains_key("POTION"));
    assert!(data.moves.contains_key("TACKLE"));
    assert!(data.types.contains_key("GRASS"));
    assert!(data.trainer_types.contains_key("YOUNGSTER"));
    assert_eq!(data.trainers[0].id, "YOUNGSTER,Joey");
    assert_eq!(data.encounters.values().next().unwrap().key.map_id, 2);
}

#[test]
fn progress_runs_through_every_status_line_and_ends_complete() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();

    let texts = RefCell::new(Vec::new());
    let fractions = RefCell::new(Vec::new());
    let mut session = LoadSession::new()
        .with_text(|t| texts.borrow_mut().push(t.to_string()))
        .with_progress(|f| fractions.borrow_mut().push(f));

    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    drop(session);

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    let texts = texts.into_inner();
    assert_eq!(texts.first().map(String::as_str), Some("Loading Scripts..."));
    assert!(texts.contains(&"Loading Tilesets...".to_string()));
    assert!(texts.contains(&"Loading Species...".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("Loading project..."));

    let fractions = fractions.into_inner();
    assert_eq!(fractions.last().copied(), Some(1.0));
    assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
}

#[test]
fn a_save_then_reload_reproduces_the_stores() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let list = roster();

    let mut session = LoadSession::new();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);

    // save into a fresh filesystem so the reload cannot lean on the seed
    let saved = MemFilesystem::new();
    let outcome = list.save(&mut LoadContext {
        filesystem: &saved,
        config: &mut config,
        data: &mut data,
        session: &mut session,
        retry: test_retry(),
    });
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert!(saved.contents(".fluorite/config").is_some());
    assert!(saved.contents("Game.ini").is_some());

    let mut reloaded = ProjectData::default();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &saved,
            config: &mut config,
            data: &mut reloaded,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);

    assert_eq!(reloaded.scripts, data.scripts);
    assert_eq!(reloaded.tilesets, data.tilesets);
    assert_eq!(reloaded.map_infos, data.map_infos);
    assert_eq!(reloaded.maps, data.maps);
    assert_eq!(reloaded.common_events, data.common_events);
    assert_eq!(reloaded.system, data.system);
    assert_eq!(reloaded.metadata, data.metadata);
    assert_eq!(reloaded.player_metadata, data.player_metadata);
    assert_eq!(reloaded.species, data.species);
    assert_eq!(reloaded.trainers, data.trainers);
    assert_eq!(reloaded.encounters, data.encounters);
}

#[test]
fn a_pbs_pass_prefers_the_text_sources() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    fs.write(
        "PBS/pokemon.txt",
        "# see the wiki for the full field list\n\
         [BULBASAUR]\n\
         Name = Bulbasaur\n\
         Types = GRASS,POISON\n\
         [CHARMANDER]\n\
         Name = Charmander\n\
         Types = FIRE\n",
    )
    .unwrap();
    fs.write("PBS/abilities.txt", "[OVERGROW]\nName = Overgrow\n")
        .unwrap();
    fs.write("PBS/items.txt", "[POTION]\nName = Potion\n").unwrap();
    fs.write("PBS/moves.txt", "[TACKLE]\nName = Tackle\n").unwrap();
    fs.write("PBS/types.txt", "[GRASS]\nName = Grass\n").unwrap();
    fs.write("PBS/trainer_types.txt", "[YOUNGSTER]\nName = Youngster\n")
        .unwrap();
    fs.write(
        "PBS/trainers.txt",
        "[YOUNGSTER,Joey]\nPokemon = RATTATA,5\n",
    )
    .unwrap();
    fs.write(
        "PBS/encounters.txt",
        "[002]\nLand = 21\n[002,1]\nLand = 10\n",
    )
    .unwrap();
    fs.write("PBS/metadata.txt", "[000]\nStartMoney = 3000\n").unwrap();
    fs.write("PBS/player_metadata.txt", "[1]\nWalkCharset = boy\n")
        .unwrap();

    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        true,
    );

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    // PBS-capable kinds come from the text files
    assert_eq!(data.species.len(), 2);
    assert!(data.species["CHARMANDER"].record.is_from_pbs());
    assert_eq!(data.encounters.len(), 2);
    assert_eq!(data.trainers[0].id, "YOUNGSTER,Joey");
    assert_eq!(data.player_metadata[&1].id, 1);
    // kinds without a PBS source still load natively
    assert_eq!(data.tilesets.len(), 2);
    assert!(data.system.is_some());
}

#[test]
fn a_missing_data_file_aborts_the_rest_of_the_load() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    fs.remove("Data/Tilesets.rxdata");

    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );

    assert!(outcome.aborted);
    assert_eq!(outcome.problems.len(), 1);
    assert_eq!(
        outcome.problems[0],
        "Fluorite was unable to load 'Data/Tilesets.rxdata' because it does not exist."
    );
    // scripts run before tilesets, maps after; the pass stopped between
    assert_eq!(data.scripts.len(), 2);
    assert!(data.maps.is_empty());
    assert!(data.species.is_empty());
}

#[test]
fn wrong_contents_report_a_type_mismatch_not_corruption() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    // a valid marshal stream of the wrong shape
    common::write_marshal(&fs, "Data/Tilesets.rxdata", &common::int(7));

    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );

    assert!(outcome.aborted);
    assert!(outcome.problems[0].contains("contains incorrect data"));
}

#[test]
fn pre_v20_metadata_keeps_the_players_inline() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    fs.remove("Data/player_metadata.dat");
    common::write_marshal(
        &fs,
        "Data/metadata.dat",
        &common::hash(vec![
            (
                common::int(0),
                common::object("GameData::Metadata", vec![("id", common::int(0))]),
            ),
            (
                common::int(1),
                common::object("GameData::Metadata", vec![("id", common::int(1))]),
            ),
        ]),
    );

    let mut config = fluorite_config::project::Config::from_project(
        fluorite_config::project::Project {
            essentials_version: fluorite_config::EssentialsVersion::V19,
            ..Default::default()
        },
    );
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert!(data.player_metadata_preloaded);
    assert_eq!(data.player_metadata.len(), 1);
    assert!(matches!(&data.player_metadata[&1].record, Record::Graph(_)));

    // on save the players go back into metadata.dat, and no
    // player_metadata.dat appears
    let outcome = list.save(&mut LoadContext {
        filesystem: &fs,
        config: &mut config,
        data: &mut data,
        session: &mut session,
        retry: test_retry(),
    });
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert!(fs.contents("Data/player_metadata.dat").is_none());

    let saved = fluorite_core::marshal::decode_value(&fs.contents("Data/metadata.dat").unwrap())
        .unwrap();
    let entries = fluorite_data::graph::into_pairs(saved).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn an_empty_hash_still_reports_complete_progress() {
    let fs = MemFilesystem::new();
    common::write_marshal(&fs, "Data/encounters.dat", &common::hash(vec![]));

    let fractions = RefCell::new(Vec::new());
    let mut session = LoadSession::new().with_progress(|f| fractions.borrow_mut().push(f));

    // a single-manager roster keeps the fraction sequence unambiguous
    let mut list = DataManagerList::new(vec![Box::new(EncounterManager)]);
    list.setup();
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    drop(session);

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert!(data.encounters.is_empty());
    // "Loading Encounters..." resets the bar, the empty file lands it on
    // 1.0, then the closing "Loading project..." does the same
    assert_eq!(fractions.into_inner(), vec![0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn a_nil_only_array_still_reports_complete_progress() {
    let fs = MemFilesystem::new();
    common::write_marshal(
        &fs,
        "Data/Tilesets.rxdata",
        &common::array(vec![alox_48::Value::Nil]),
    );

    let fractions = RefCell::new(Vec::new());
    let mut session = LoadSession::new().with_progress(|f| fractions.borrow_mut().push(f));

    let mut list = DataManagerList::new(vec![Box::new(TilesetManager)]);
    list.setup();
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    drop(session);

    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);
    assert!(data.tilesets.is_empty());
    assert_eq!(fractions.into_inner(), vec![0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn a_locked_map_does_not_stop_the_other_maps_or_the_infos() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);

    let saved = MemFilesystem::new();
    saved.lock_forever("Data/Map001.rxdata");
    let outcome = list.save(&mut LoadContext {
        filesystem: &saved,
        config: &mut config,
        data: &mut data,
        session: &mut session,
        retry: test_retry(),
    });

    assert_eq!(outcome.problems.len(), 1);
    assert!(outcome.problems[0].starts_with("Fluorite was unable to save 'Data/Map001.rxdata'"));
    assert!(outcome.problems[0].contains("All other data has been saved successfully."));
    // the remaining map and the infos were still written
    assert!(saved.contents("Data/Map002.rxdata").is_some());
    assert!(saved.contents("Data/MapInfos.rxdata").is_some());
}

#[test]
#[should_panic(expected = "setup must run before load")]
fn loading_before_setup_panics() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = DataManagerList::standard();
    let _ = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
}

#[test]
fn clear_returns_every_store_to_empty() {
    let fs = MemFilesystem::new();
    common::seed_project(&fs);
    let mut config = common::project_config();
    let mut data = ProjectData::default();
    let mut session = LoadSession::new();
    let list = roster();
    let outcome = list.load(
        &mut LoadContext {
            filesystem: &fs,
            config: &mut config,
            data: &mut data,
            session: &mut session,
            retry: test_retry(),
        },
        false,
    );
    assert!(outcome.is_ok(), "problems: {:?}", outcome.problems);

    list.clear(&mut data);
    assert!(data.scripts.is_empty());
    assert!(data.tilesets.is_empty());
    assert!(data.maps.is_empty());
    assert!(data.map_infos.is_empty());
    assert!(data.common_events.is_empty());
    assert!(data.system.is_none());
    assert!(data.metadata.is_none());
    assert!(data.player_metadata.is_empty());
    assert!(data.species.is_empty());
    assert!(data.trainers.is_empty());
    assert!(data.encounters.is_empty());
}
