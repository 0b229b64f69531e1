use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use planto::clock::FixedClock;
use planto::models::*;
use planto::reminder::NoopScheduler;
use planto::store::{PlantStore, SnapshotFile, StoreEvent};
use speculate2::speculate;
use tempfile::TempDir;

fn noon() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-09-12T12:00:00-04:00").unwrap()
}

fn open(path: &PathBuf, clock: &FixedClock) -> PlantStore {
    PlantStore::open(path, Arc::new(NoopScheduler), Arc::new(clock.clone()))
}

fn saved(path: &PathBuf) -> Vec<Plant> {
    SnapshotFile::new(path).load().expect("Failed to read snapshot")
}

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plants.json");
        let clock = FixedClock::new(noon());
    }

    describe "saving" {
        it "writes the whole collection after every mutation" {
            let store = open(&path, &clock);
            let pothos = store.add(CreatePlantInput::named("Pothos"));
            let fern = store.add(CreatePlantInput::named("Fern"));
            assert_eq!(saved(&path).len(), 2);

            store.toggle_watered(fern.id);
            assert!(saved(&path)[1].is_watered);

            store.remove(pothos.id);
            assert_eq!(saved(&path), store.plants());
        }

        it "survives a reopen unchanged" {
            let store = open(&path, &clock);
            let basil = store.add(CreatePlantInput {
                room: Room::Kitchen,
                light: Light::PartialSun,
                watering_days: WateringDays::Every2Days,
                water: Water::Ml50To100,
                ..CreatePlantInput::named("Basil")
            });
            store.add(CreatePlantInput::named("Cactus"));
            store.toggle_watered(basil.id);
            let before = store.plants();

            let reopened = open(&path, &clock);
            assert_eq!(reopened.plants(), before);
            assert!(reopened.load_error().is_none());
        }

        it "keeps the plant in memory when the write fails" {
            let blocker = dir.path().join("blocker");
            fs::write(&blocker, "not a directory").unwrap();
            let store = open(&blocker.join("plants.json"), &clock);
            let mut events = store.subscribe();

            let plant = store.add(CreatePlantInput::named("Pothos"));

            assert_eq!(store.get(plant.id), Some(plant.clone()));
            assert!(store.last_save_error().is_some());
            assert!(matches!(events.try_recv(), Ok(StoreEvent::SaveFailed(_))));
            assert_eq!(events.try_recv().unwrap(), StoreEvent::Added(plant.id));
        }
    }

    describe "loading" {
        it "starts empty without a snapshot" {
            let store = open(&path, &clock);
            assert!(store.is_empty());
            assert!(store.load_error().is_none());
            assert!(!path.exists());
        }

        it "fills in missing ids and watered flags" {
            fs::write(&path, r#"[
                {
                    "name": "Fern",
                    "room": "bathroom",
                    "light": "lowLight",
                    "wateringDays": "every3Days",
                    "water": "ml50to100"
                },
                {
                    "id": "7f1c1f3e-4a54-4a8e-9d7c-3c2a4f0e9b11",
                    "name": "Pothos",
                    "room": "livingroom",
                    "light": "fullSun",
                    "wateringDays": "everyDay",
                    "water": "ml20to50",
                    "isWatered": false
                }
            ]"#).unwrap();

            let store = open(&path, &clock);
            let plants = store.plants();

            assert_eq!(plants.len(), 2);
            assert!(!plants[0].id.is_nil());
            assert!(!plants[0].is_watered);
            assert_eq!(plants[0].room, Room::Bathroom);
            assert_eq!(plants[1].id.to_string(), "7f1c1f3e-4a54-4a8e-9d7c-3c2a4f0e9b11");
            assert_eq!(plants[1].room, Room::LivingRoom);
            assert!(store.load_error().is_none());
        }

        it "drops plants that repeat an id" {
            let plant = Plant::new(CreatePlantInput::named("Pothos"));
            let mut twin = plant.clone();
            twin.name = "Twin".to_string();
            SnapshotFile::new(&path).save(&[plant.clone(), twin]).unwrap();

            let store = open(&path, &clock);
            assert_eq!(store.plants(), vec![plant]);
        }

        it "falls back to empty and keeps a backup of a corrupt snapshot" {
            fs::write(&path, "[{\"name\": ").unwrap();

            let store = open(&path, &clock);
            assert!(store.is_empty());
            assert!(store.load_error().is_some());

            let backup = dir.path().join("plants.json.bak");
            assert_eq!(fs::read_to_string(&backup).unwrap(), "[{\"name\": ");

            store.add(CreatePlantInput::named("Pothos"));
            assert_eq!(saved(&path).len(), 1);
            assert_eq!(fs::read_to_string(&backup).unwrap(), "[{\"name\": ");
        }

        it "refuses to save over a snapshot it could not back up" {
            fs::write(&path, "[{\"name\": ").unwrap();
            let backup = dir.path().join("plants.json.bak");
            fs::create_dir(&backup).unwrap();
            fs::write(backup.join("keep.txt"), "older backup").unwrap();

            let store = open(&path, &clock);
            let mut events = store.subscribe();
            assert!(store.load_error().is_some());

            let plant = store.add(CreatePlantInput::named("Pothos"));

            assert_eq!(store.plants(), vec![plant]);
            assert!(store.last_save_error().is_some());
            assert!(matches!(events.try_recv(), Ok(StoreEvent::SaveFailed(_))));
            assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"name\": ");
        }

        it "backs up and reports a snapshot that cannot be read" {
            fs::create_dir(&path).unwrap();
            fs::write(path.join("notes.txt"), "not a snapshot").unwrap();

            let store = open(&path, &clock);
            assert!(store.is_empty());
            assert!(store.load_error().is_some());

            store.add(CreatePlantInput::named("Pothos"));
            assert!(store.last_save_error().is_some());
            assert_eq!(fs::read_to_string(path.join("notes.txt")).unwrap(), "not a snapshot");
        }

        it "runs the daily rollover and saves the result" {
            let mut plant = Plant::new(CreatePlantInput::named("Pothos"));
            let yesterday = noon().with_timezone(&Utc) - Duration::days(1);
            plant.is_watered = true;
            plant.last_watered_at = Some(yesterday);
            SnapshotFile::new(&path).save(&[plant.clone()]).unwrap();

            let store = open(&path, &clock);

            let loaded = store.get(plant.id).unwrap();
            assert!(!loaded.is_watered);
            assert_eq!(loaded.last_watered_at, Some(yesterday));
            assert!(!saved(&path)[0].is_watered);
        }

        it "does not rewrite the snapshot when nothing rolled over" {
            let mut plant = Plant::new(CreatePlantInput::named("Pothos"));
            plant.is_watered = true;
            plant.last_watered_at = Some(noon().with_timezone(&Utc) - Duration::hours(2));
            fs::write(&path, serde_json::to_string(&[plant]).unwrap()).unwrap();
            let written = fs::read_to_string(&path).unwrap();

            let store = open(&path, &clock);
            assert_eq!(store.completed_count(), 1);
            assert_eq!(fs::read_to_string(&path).unwrap(), written);
        }
    }
}
