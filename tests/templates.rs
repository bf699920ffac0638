use saphire_console::domain::machine::Machine;
use saphire_console::domain::preferences::Language;
use saphire_console::domain::qc_entry::{EntryValue, EntryValues};
use saphire_console::domain::qc_template::QcFormTemplate;
use saphire_console::dto::operator::SampleGrid;
use saphire_console::i18n::catalog_map;
use serde_json::json;
use tera::{Context, Tera};

fn tera() -> Tera {
    Tera::new("templates/**/*").expect("templates parse")
}

fn template() -> QcFormTemplate {
    serde_json::from_value(json!({
        "id": 7, "code": "QC-7", "name": "Shaft",
        "sections": [
            {"id": 1, "name": "Control Points", "isRepeatable": false,
             "fields": [
                {"id": 10, "fieldKey": "visual", "label": "Visual", "inputType": "PASS_FAIL", "required": true}
             ]},
            {"id": 2, "name": "Repeated Controls", "isRepeatable": true, "repeatCount": 5,
             "fields": [
                {"id": 20, "fieldKey": "length", "label": "Length", "inputType": "DECIMAL",
                 "minValue": 9.5, "maxValue": 10.5, "required": true}
             ]}
        ]
    }))
    .unwrap()
}

fn entry_context(lang: Language) -> Context {
    let template = template();
    let machine: Machine = serde_json::from_value(json!({
        "id": 4, "locationId": 1, "code": "CNC-04", "name": "Lathe", "active": true
    }))
    .unwrap();

    let mut values = EntryValues::new();
    values.set("length_sample_1", EntryValue::Text("10.1".into()));
    values.set("visual", EntryValue::Bool(true));

    let grids = template
        .repeating_sections()
        .map(|section| SampleGrid {
            samples: values.sample_summaries(section),
            current: 2,
            section: section.clone(),
        })
        .collect::<Vec<_>>();
    let plain_sections = template.plain_sections().cloned().collect::<Vec<_>>();
    let progress = values.progress(&template);

    let mut context = Context::new();
    context.insert("alerts", &Vec::<(String, String)>::new());
    context.insert(
        "current_user",
        &json!({"name": "Ayşe", "username": "op1", "role": "OPERATOR", "is_admin": false, "can_review": false}),
    );
    context.insert("current_page", "entry");
    context.insert("t", catalog_map(lang));
    context.insert("lang", lang.code());
    context.insert("theme", "light");
    context.insert("sidebar_collapsed", &false);
    context.insert("show_tour", &false);
    context.insert("search_debounce_ms", &500);
    context.insert("window_open", &true);
    context.insert("template", &template);
    context.insert("machine", &machine);
    context.insert("task", &Option::<()>::None);
    context.insert("plain_sections", &plain_sections);
    context.insert("grids", &grids);
    context.insert("values", &values);
    context.insert("notes", &Option::<String>::None);
    context.insert("progress", &progress);
    context.insert("progress_percent", &progress.percent());
    context.insert("has_draft", &true);
    context.insert("task_id", &Option::<i64>::None);
    context.insert("form_action", "/m/entry/7/4");
    context.insert("discard_action", "/m/entry/7/4/discard");
    context
}

#[test]
fn entry_page_renders_one_button_per_sample() {
    let html = tera()
        .render("m/entry.html", &entry_context(Language::En))
        .unwrap();

    assert_eq!(html.matches("class=\"sample-btn").count(), 5);
    assert!(html.contains("value=\"sample:5\""));
    assert!(html.contains("name=\"length_sample_2\""));
    assert!(html.contains("data-min=\"9.5\""));
}

#[test]
fn entry_page_follows_language() {
    let html = tera()
        .render("m/entry.html", &entry_context(Language::Tr))
        .unwrap();

    assert!(html.contains("lang=\"tr\""));
    assert!(html.contains(catalog_map(Language::Tr)["save_draft"]));
}

#[test]
fn closed_window_still_offers_submit() {
    let mut context = entry_context(Language::En);
    context.insert("window_open", &false);
    let html = tera().render("m/entry.html", &context).unwrap();

    assert!(html.contains("value=\"submit\""));
    assert!(html.contains("badge-expired"));
}
