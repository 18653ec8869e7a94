mod common;

use std::fs;

use bestiary::content::BuiltinSource;
use bestiary::loader::read_text;
use bestiary::{load_bundle, load_monsters, CrValue, DirSource, IndexEntry, LoadError};
use common::MemorySource;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn failed_record_is_dropped_and_order_kept() {
    let source = MemorySource::default()
        .with("first.json", Some("First"), Some(json!({ "name": "First", "cr": "5" })))
        .with("second.json", Some("Second"), None)
        .with("third.json", Some("Third"), Some(json!({ "name": "Third", "cr": "1" })));

    let report = load_monsters(&source).unwrap();
    let files: Vec<&str> = report.monsters.iter().map(|m| m.file.as_str()).collect();
    assert_eq!(files, ["first.json", "third.json"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "second.json");
    assert!(matches!(report.failures[0].error, LoadError::NotFound(_)));
}

#[test]
fn index_failure_is_fatal() {
    let source = MemorySource {
        index_fails: true,
        ..Default::default()
    };
    assert!(load_monsters(&source).is_err());
}

#[test]
fn records_are_decorated_on_load() {
    let source = MemorySource::default()
        .with("goblin.json", Some("Goblin (Label)"), Some(json!({
            "name": "Goblin", "cr": "1/4 (50 XP)", "tags": ["goblinoid", "mm"]
        })))
        .with("ooze.json", None, Some(json!({ "type": "ooze" })));

    let report = load_monsters(&source).unwrap();
    let goblin = &report.monsters[0];
    assert_eq!(goblin.display_name, "Goblin (Label)");
    assert_eq!(goblin.clean_cr, "1/4");
    assert_eq!(goblin.cr_sort, CrValue::Sortable(0.25));
    assert_eq!(goblin.source.as_deref(), Some("mm"));

    let ooze = &report.monsters[1];
    assert_eq!(ooze.display_name, "ooze");
    assert_eq!(ooze.clean_cr, "?");
    assert_eq!(ooze.cr_sort, CrValue::Unsortable);
    assert_eq!(ooze.source, None);
}

#[test]
fn display_name_falls_back_through_label_name_file() {
    let source = MemorySource::default()
        .with("a.json", Some("Label"), Some(json!({ "name": "Own" })))
        .with("b.json", None, Some(json!({ "name": "Own" })))
        .with("c-thing.json", Some(""), Some(json!({})));
    let report = load_monsters(&source).unwrap();
    let names: Vec<&str> = report.monsters.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, ["Label", "Own", "c-thing"]);
}

#[test]
fn dir_source_reads_index_and_skips_bad_files() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("index.json"),
        r#"[{"file":"wolf.json","name":"Wolf"},"broken.json",{"file":"missing.json"},"rat.json"]"#,
    )
    .unwrap();
    fs::write(dir.path().join("wolf.json"), r#"{"name":"Wolf","cr":"1/4","type":"beast"}"#).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("rat.json"), r#"{"name":"Rat","cr":0,"tags":null}"#).unwrap();

    let report = load_monsters(&DirSource::new(dir.path(), "index.json")).unwrap();
    let files: Vec<&str> = report.monsters.iter().map(|m| m.file.as_str()).collect();
    assert_eq!(files, ["wolf.json", "rat.json"]);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0].error, LoadError::Json { .. }));
    assert!(matches!(report.failures[1].error, LoadError::Io { .. }));

    let rat = &report.monsters[1];
    assert_eq!(rat.clean_cr, "0");
    assert_eq!(rat.cr_sort, CrValue::Sortable(0.0));
    assert!(rat.record.tags.is_empty());
}

#[test]
fn missing_index_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_monsters(&DirSource::new(dir.path(), "index.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn index_entries_accept_bare_and_labeled_forms() {
    let entries: Vec<IndexEntry> =
        serde_json::from_str(r#"["a.json", {"file": "b.json", "name": "Bee"}, {"file": "c.json"}]"#)
            .unwrap();
    assert_eq!(entries[0].file(), "a.json");
    assert_eq!(entries[0].label(), None);
    assert_eq!(entries[1].label(), Some("Bee"));
    assert_eq!(entries[2].file(), "c.json");
    assert_eq!(entries[2].label(), None);
}

#[test]
fn bundle_elements_load_independently() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monsters.json");
    fs::write(
        &path,
        r#"[
            {"_file": "goblin.json", "_displayName": "Goblin", "name": "Goblin", "cr": "1/4", "tags": ["mm"]},
            {"name": "Bad", "traits": "not a list"},
            {"name": "Ogre Chief", "cr": "4"}
        ]"#,
    )
    .unwrap();

    let report = load_bundle(&path).unwrap();
    assert_eq!(report.monsters.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.monsters[0].file, "goblin.json");
    assert_eq!(report.monsters[0].source.as_deref(), Some("mm"));
    assert_eq!(report.monsters[1].file, "ogre-chief.json");
    assert_eq!(report.monsters[1].display_name, "Ogre Chief");
}

#[test]
fn bundle_that_is_not_an_array_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monsters.json");
    fs::write(&path, r#"{"name": "Goblin"}"#).unwrap();
    assert!(load_bundle(&path).is_err());
}

#[test]
fn byte_order_mark_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.json");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"name":"Bom"}"#);
    fs::write(&path, bytes).unwrap();
    assert_eq!(read_text(&path).unwrap(), r#"{"name":"Bom"}"#);
}

#[test]
fn unknown_fields_survive_a_round_trip() {
    let source = MemorySource::default().with(
        "x.json",
        None,
        Some(json!({ "name": "X", "homebrew_notes": { "author": "me" }, "ac": 12 })),
    );
    let report = load_monsters(&source).unwrap();
    let record = &report.monsters[0].record;
    assert_eq!(record.extra["homebrew_notes"]["author"], "me");
    let back = serde_json::to_value(record).unwrap();
    assert_eq!(back, json!({ "name": "X", "homebrew_notes": { "author": "me" }, "ac": 12 }));
}

#[test]
fn builtin_sample_loads_completely() {
    let report = load_monsters(&BuiltinSource::default()).unwrap();
    assert_eq!(report.monsters.len(), 6);
    assert!(report.failures.is_empty());
}

#[test]
fn loosely_typed_records_still_load() {
    let source = MemorySource::default()
        .with("bat.json", None, Some(json!({
            "name": "Bat", "cr": "0",
            "traits": [{ "name": "Echolocation", "desc": null }, null],
        })))
        .with("stirge.json", None, Some(json!({ "name": "Stirge", "cr": "1/8", "tags": ["mm", null] })))
        .with("seven.json", None, Some(json!({ "name": 7, "type": null, "abilities": null, "lairactions": null })));

    let report = load_monsters(&source).unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.monsters.len(), 3);

    let bat = &report.monsters[0];
    assert_eq!(bat.display_name, "Bat");
    assert_eq!(bat.record.traits.len(), 1);
    assert_eq!(bat.record.traits[0].name, "Echolocation");
    assert_eq!(bat.record.traits[0].desc, "");

    let stirge = &report.monsters[1];
    assert_eq!(stirge.record.tags, ["mm"]);
    assert_eq!(stirge.source.as_deref(), Some("mm"));
    assert_eq!(stirge.cr_sort, CrValue::Sortable(0.125));

    let seven = &report.monsters[2];
    assert_eq!(seven.display_name, "7");
    assert_eq!(seven.creature_type(), None);
    assert!(seven.record.abilities.is_empty());
    assert_eq!(seven.clean_cr, "?");
}

#[test]
fn loose_record_on_disk_loads_from_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.json"), r#"["odd.json"]"#).unwrap();
    fs::write(
        dir.path().join("odd.json"),
        r#"{ "name": "Odd", "size": 3, "alignment": null, "abilities": { "dex": 14, "str": 8 },
             "actions": [{ "name": null, "desc": "Bites." }] }"#,
    )
    .unwrap();

    let report = load_monsters(&DirSource::new(dir.path(), "index.json")).unwrap();
    assert!(report.failures.is_empty());
    let odd = &report.monsters[0];
    assert_eq!(odd.record.size.as_deref(), Some("3"));
    assert_eq!(odd.record.alignment, None);
    let keys: Vec<&str> = odd.record.abilities.keys().map(String::as_str).collect();
    assert_eq!(keys, ["dex", "str"]);
    assert_eq!(odd.record.actions[0].name, "");
    assert_eq!(odd.record.actions[0].desc, "Bites.");
}
