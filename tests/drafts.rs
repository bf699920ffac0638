use chrono::{Duration, NaiveDate};
use saphire_console::domain::draft::NewQcDraft;
use saphire_console::domain::qc_entry::{EntryValue, EntryValues, draft_key};
use saphire_console::domain::types::{MachineId, TemplateId, UserId};
use saphire_console::repository::{DieselRepository, DraftReader, DraftWriter};

mod common;

fn new_draft(user: i64, template: i64, machine: i64, values: EntryValues) -> NewQcDraft {
    NewQcDraft {
        user_id: UserId::new(user).unwrap(),
        template_id: TemplateId::new(template).unwrap(),
        machine_id: MachineId::new(machine).unwrap(),
        values,
        notes: None,
        updated_at: NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    }
}

#[test]
fn test_draft_save_load_replace_delete() {
    let test_db = common::TestDb::new("test_drafts.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = UserId::new(7).unwrap();
    let key = draft_key(TemplateId::new(3).unwrap(), MachineId::new(4).unwrap());

    let mut values = EntryValues::new();
    values.set("temp_sample_1", EntryValue::Text("21.5".into()));
    values.set("clean", EntryValue::Bool(true));
    let saved = repo.save_draft(&new_draft(7, 3, 4, values.clone())).unwrap();
    assert_eq!(saved.draft_key, key);

    let loaded = repo.get_draft(user, &key).unwrap().unwrap();
    assert_eq!(loaded.values, values);
    assert_eq!(loaded.notes, None);

    // Saving under the same key replaces the payload.
    let mut replacement = EntryValues::new();
    replacement.set("temp_sample_1", EntryValue::Text("22".into()));
    let mut draft = new_draft(7, 3, 4, replacement.clone());
    draft.notes = Some("line stopped".into());
    draft.updated_at += Duration::minutes(5);
    repo.save_draft(&draft).unwrap();

    let drafts = repo.list_drafts(user).unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].values, replacement);
    assert_eq!(drafts[0].notes.as_deref(), Some("line stopped"));

    repo.delete_draft(user, &key).unwrap();
    assert!(repo.get_draft(user, &key).unwrap().is_none());
}

#[test]
fn test_drafts_are_scoped_per_user() {
    let test_db = common::TestDb::new("test_drafts_users.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.save_draft(&new_draft(1, 3, 4, EntryValues::new())).unwrap();
    repo.save_draft(&new_draft(2, 3, 4, EntryValues::new())).unwrap();
    repo.save_draft(&new_draft(2, 5, 4, EntryValues::new())).unwrap();

    assert_eq!(repo.list_drafts(UserId::new(1).unwrap()).unwrap().len(), 1);
    assert_eq!(repo.list_drafts(UserId::new(2).unwrap()).unwrap().len(), 2);

    let key = draft_key(TemplateId::new(3).unwrap(), MachineId::new(4).unwrap());
    repo.delete_draft(UserId::new(1).unwrap(), &key).unwrap();
    assert!(repo.get_draft(UserId::new(2).unwrap(), &key).unwrap().is_some());
}
