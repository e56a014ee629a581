use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use phrasr::config::Config;
use phrasr::engine::segmenter;
use phrasr::engine::view::{self, FilterMode, SortMode};
use phrasr::session::phrase_store::{Clock, PhraseStore};
use phrasr::store::json_store::JsonStore;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn open_store(dir: &TempDir, seed: u64) -> PhraseStore {
    let json = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    PhraseStore::with_parts(
        Config::default(),
        Some(json),
        SmallRng::seed_from_u64(seed),
        Box::new(FixedClock(Utc.with_ymd_and_hms(2026, 8, 31, 10, 0, 0).unwrap())),
    )
}

const SCRIPT: &str = "Bonjour et bienvenue au musée. \
    Nous allons commencer la visite. \
    Cette salle présente des peintures du XIXe siècle. \
    N'hésitez pas à poser des questions. \
    Merci et au revoir!";

#[test]
fn script_save_persists_across_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = open_store(&dir, 1);
        let created = store.create(&segmenter::segment(SCRIPT)).unwrap();
        assert_eq!(created.len(), 5);
    }

    let store = open_store(&dir, 2);
    assert_eq!(store.phrases().len(), 5);
    assert_eq!(store.phrases()[0].text, "Bonjour et bienvenue au musée.");
    assert_eq!(store.phrases()[4].text, "Merci et au revoir!");
}

#[test]
fn practice_events_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let id;

    {
        let mut store = open_store(&dir, 1);
        let created = store.create(&segmenter::segment(SCRIPT)).unwrap();
        id = created[0].id;
        store.record_play(id, 120.0).unwrap();
        store.record_play(id, 60.0).unwrap();
        store.toggle_practiced(id).unwrap();
    }

    let store = open_store(&dir, 2);
    let p = store.get(id).unwrap();
    assert_eq!(p.spoken_count, 2);
    assert_eq!(p.practice_time, 3);
    assert!(p.practiced);
    assert!(p.confidence >= 30);
    assert_eq!(store.progress_data().count, 1);
    assert_eq!(store.progress_data().streak_days, 1);
}

#[test]
fn split_then_merge_round_trips_the_collection() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, 7);
    let created = store
        .create(&["Bonjour à tous. Merci d'être venus.".to_string()])
        .unwrap();

    let parts = store.split(created[0].id).unwrap();
    assert_eq!(store.phrases().len(), 2);

    let merged = store.merge(parts[0].id, parts[1].id).unwrap();
    assert_eq!(store.phrases().len(), 1);
    assert_eq!(merged.text, "Bonjour à tous. Merci d'être venus.");
    assert_eq!(merged.id, parts[0].id);
}

#[test]
fn ids_stay_unique_across_reopen_and_delete() {
    let dir = TempDir::new().unwrap();
    let first_ids: Vec<u64>;

    {
        let mut store = open_store(&dir, 1);
        let created = store.create(&segmenter::segment(SCRIPT)).unwrap();
        first_ids = created.iter().map(|p| p.id.0).collect();
        store.delete(created[0].id).unwrap();
    }

    let mut store = open_store(&dir, 2);
    let fresh = store
        .create(&["Une toute nouvelle phrase.".to_string()])
        .unwrap();
    // Deleted ids are never reissued
    assert!(!first_ids.contains(&fresh[0].id.0));
}

#[test]
fn view_over_persisted_collection() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, 3);
    let created = store.create(&segmenter::segment(SCRIPT)).unwrap();
    store.edit(created[1].id, "Suivez-moi s'il vous plaît.").unwrap();
    for _ in 0..3 {
        store.record_play(created[2].id, 30.0).unwrap();
    }

    let custom = view::view(store.phrases(), FilterMode::Custom, SortMode::Alpha);
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0].text, "Suivez-moi s'il vous plaît.");

    let frequent = view::view(store.phrases(), FilterMode::Frequent, SortMode::Spoken);
    assert_eq!(frequent.len(), 1);
    assert_eq!(frequent[0].id, created[2].id);
}

#[test]
fn script_history_is_capped_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, 5);

    for i in 0..12 {
        store.remember_script(&format!("Script numéro {i}.")).unwrap();
    }
    store.remember_script("Script numéro 3.").unwrap();

    let scripts = store.recent_scripts();
    assert_eq!(scripts.len(), 10);
    // Re-saving an old script moves it to the most recent slot
    assert_eq!(scripts.last().unwrap(), "Script numéro 3.");
    assert_eq!(scripts.iter().filter(|s| *s == "Script numéro 3.").count(), 1);
}
