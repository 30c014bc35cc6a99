use std::time::Duration;

use rollbook::form::{DeleteOutcome, Mode, SubmitOutcome, MSG_ADDED};
use rollbook::notify::{ManualClock, Phase};
use rollbook::store::parse_records;
use rollbook::{App, Config, Field, MemorySlotStore, RecordData, RecordId, RecordStore, SlotStore};

const KEY: &str = "students";

fn ann() -> RecordData {
    RecordData {
        name: "Ann Lee".to_string(),
        uid: "101".to_string(),
        email: "a@b.co".to_string(),
        contact: "1234567890".to_string(),
    }
}

fn new_app() -> App<MemorySlotStore, ManualClock> {
    App::new(MemorySlotStore::new(), &Config::default(), ManualClock::new())
}

fn type_record(app: &mut App<MemorySlotStore, ManualClock>, data: &RecordData) {
    for field in Field::ALL {
        app.input(field, data.get(field));
    }
}

#[test]
fn add_to_empty_store_persists_one_record() {
    let mut store = RecordStore::load(MemorySlotStore::new(), KEY);
    let record = store.add(ann()).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(record.data, ann());
    let blob = store.slots().get(KEY).unwrap().unwrap();
    assert_eq!(parse_records(&blob).unwrap(), vec![record]);
}

#[test]
fn update_changes_name_but_keeps_id_and_length() {
    let mut store = RecordStore::load(MemorySlotStore::new(), KEY);
    let x = store.add(ann()).unwrap();

    let changed = RecordData {
        name: "Ann K. Lee".to_string(),
        ..ann()
    };
    assert!(store.update(&x.id, changed).unwrap());

    assert_eq!(store.len(), 1);
    let stored = store.find(&x.id).unwrap();
    assert_eq!(stored.id, x.id);
    assert_eq!(stored.data.name, "Ann K. Lee");
}

#[test]
fn update_unknown_id_fails_without_change() {
    let mut store = RecordStore::load(MemorySlotStore::new(), KEY);
    store.add(ann()).unwrap();
    let before = store.records().to_vec();

    let missing: RecordId = "does-not-exist".parse().unwrap();
    assert!(!store.update(&missing, ann()).unwrap());
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn submit_with_bad_uid_adds_nothing_and_marks_uid() {
    let mut app = new_app();
    type_record(
        &mut app,
        &RecordData {
            uid: "12a".to_string(),
            ..ann()
        },
    );

    let outcome = app.submit().unwrap();

    assert!(matches!(outcome, SubmitOutcome::Invalid(report) if !report.is_valid()));
    assert!(app.store().is_empty());
    assert!(app.form().markers().is_marked(Field::Uid));
    assert!(!app.form().markers().is_marked(Field::Name));
    assert!(app.table().placeholder_visible);
}

#[test]
fn deleting_the_edited_record_resets_the_form() {
    let mut app = new_app();
    type_record(&mut app, &ann());
    app.submit().unwrap();
    let id = app.store().records()[0].id.clone();

    assert!(app.edit(&id));
    assert_eq!(app.form().mode(), &Mode::Edit(id.clone()));
    assert_eq!(app.form().submit_label(), "Update Student");

    let outcome = app.delete(&id, &mut |_: &str| true).unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted { form_reset: true });
    assert_eq!(app.form().mode(), &Mode::Create);
    assert_eq!(app.form().submit_label(), "Add Student");
    assert_eq!(app.form().title(), "Add New Student");
    for field in Field::ALL {
        assert_eq!(app.form().field(field), "");
    }
    assert!(app.store().is_empty());
}

#[test]
fn render_order_matches_insertion_order() {
    let mut app = new_app();
    type_record(&mut app, &ann());
    app.submit().unwrap();
    type_record(
        &mut app,
        &RecordData {
            name: "Bo Chen".to_string(),
            uid: "102".to_string(),
            ..ann()
        },
    );
    app.submit().unwrap();

    let names: Vec<&str> = app
        .table()
        .rows
        .iter()
        .map(|row| row.cells[0].as_str())
        .collect();
    assert_eq!(names, vec!["Ann Lee", "Bo Chen"]);

    let ids: Vec<&RecordId> = app.table().rows.iter().map(|row| &row.id).collect();
    let stored: Vec<&RecordId> = app.store().records().iter().map(|r| &r.id).collect();
    assert_eq!(ids, stored);
}

#[test]
fn notification_follows_simulated_time() {
    let mut app = new_app();
    type_record(&mut app, &ann());
    app.submit().unwrap();

    let notice = app.notification().unwrap();
    assert_eq!(notice.message, MSG_ADDED);
    assert_eq!(notice.phase, Phase::Showing);

    app.clock().advance(Duration::from_millis(10));
    assert_eq!(app.tick(), Some(Phase::Visible));
    app.clock().advance(Duration::from_millis(3000));
    assert_eq!(app.tick(), Some(Phase::Hiding));
    app.clock().advance(Duration::from_millis(300));
    assert_eq!(app.tick(), Some(Phase::Removed));
    assert!(app.notification().is_none());
}

#[test]
fn legacy_blob_with_mixed_id_types_loads() {
    let mut slots = MemorySlotStore::new();
    slots
        .set(
            KEY,
            r#"[
                {"id":1700000000000,"name":"Ann Lee","uid":"101","email":"a@b.co","contact":"1234567890"},
                {"id":"1700000000500","name":"Bo Chen","uid":"102","email":"b@c.io","contact":"0987654321"}
            ]"#,
        )
        .unwrap();

    let mut app = App::new(slots, &Config::default(), ManualClock::new());
    assert_eq!(app.store().len(), 2);

    let from_ui: RecordId = "1700000000000".parse().unwrap();
    assert!(app.edit(&from_ui));
    assert_eq!(app.form().field(Field::Name), "Ann Lee");

    app.reset_form();
    type_record(&mut app, &ann());
    app.submit().unwrap();
    let added = &app.store().records()[2];
    assert!(added.id.sequence().unwrap() > 1_700_000_000_500);
}
