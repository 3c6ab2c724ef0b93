// Composition tests — the stem step inside a recipe.
//
// These exercise the data flow the host drives:
//   roles -> schema -> selector resolution -> train -> apply
// plus JSON persistence of a trained step and the whole-dataset factor
// normalization that happens on every apply.

use stemstep::data::{Column, ColumnData, Dataset, Schema, Selector};
use stemstep::steps::{Recipe, StemStep};
use stemstep::StepError;

fn tokens(rows: &[&[&str]]) -> ColumnData {
    ColumnData::Tokens(
        rows.iter()
            .map(|r| r.iter().map(|t| t.to_string()).collect())
            .collect(),
    )
}

fn reviews() -> Dataset {
    Dataset::new(vec![
        Column::new(
            "rating",
            ColumnData::Factor {
                levels: vec!["bad".to_string(), "good".to_string()],
                codes: vec![Some(1), Some(0), None],
            },
        ),
        Column::new(
            "title_tok",
            tokens(&[&["loved", "it"], &["broken"], &[]]),
        ),
        Column::new(
            "body_tok",
            tokens(&[
                &["works", "wonderfully"],
                &["stopped", "working", "after", "updates"],
                &["no", "comments"],
            ]),
        ),
        Column::new(
            "raw",
            ColumnData::Text(vec![
                Some("Loved it".to_string()),
                Some("Broken".to_string()),
                None,
            ]),
        ),
    ])
    .unwrap()
}

// ============================================================
// Recipe: prep -> bake
// ============================================================

#[test]
fn recipe_stems_all_token_columns() {
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::EndsWith("_tok".into())]))
        .unwrap()
        .prep(&reviews())
        .unwrap();

    let baked = recipe.bake(&reviews()).unwrap();
    assert_eq!(
        baked.column("body_tok"),
        Some(&tokens(&[
            &["work", "wonder"],
            &["stop", "work", "after", "updat"],
            &["no", "comment"],
        ]))
    );
    assert_eq!(
        baked.column("title_tok"),
        Some(&tokens(&[&["love", "it"], &["broken"], &[]]))
    );
    assert_eq!(baked.column("raw"), reviews().column("raw"));
}

#[test]
fn apply_turns_factors_into_text() {
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("body_tok")]))
        .unwrap()
        .prep(&reviews())
        .unwrap();

    let baked = recipe.bake(&reviews()).unwrap();
    assert_eq!(
        baked.column("rating"),
        Some(&ColumnData::Text(vec![
            Some("good".to_string()),
            Some("bad".to_string()),
            None,
        ]))
    );
    assert_eq!(baked.column_names(), reviews().column_names());
}

#[test]
fn skipped_step_is_left_out_of_bake() {
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("title_tok")]).skip(true))
        .unwrap()
        .add_step(StemStep::new(vec![Selector::name("body_tok")]))
        .unwrap()
        .prep(&reviews())
        .unwrap();

    let baked = recipe.bake(&reviews()).unwrap();
    assert_eq!(baked.column("title_tok"), reviews().column("title_tok"));
    assert_ne!(baked.column("body_tok"), reviews().column("body_tok"));
}

#[test]
fn roles_drive_selection() {
    let recipe = Recipe::new()
        .update_role("body_tok", "predictor")
        .add_step(StemStep::new(vec![Selector::HasRole("predictor".into())]))
        .unwrap()
        .prep(&reviews())
        .unwrap();

    let tidy = recipe.tidy();
    assert_eq!(tidy.len(), 1);
    assert_eq!(tidy[0].0, 1);
    assert_eq!(tidy[0].1.terms, "body_tok");
}

#[test]
fn prep_fails_whole_recipe_on_bad_column() {
    let result = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("body_tok")]))
        .unwrap()
        .add_step(StemStep::new(vec![Selector::name("raw")]))
        .unwrap()
        .prep(&reviews());

    assert!(matches!(result, Err(StepError::Type { .. })));
}

#[test]
fn recipe_tidy_before_and_after_prep() {
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("title_tok"), Selector::name("body_tok")]))
        .unwrap();

    let before = recipe.tidy();
    assert_eq!(before.len(), 2);
    assert!(before.iter().all(|(_, row)| row.value.is_none()));

    let after = recipe.prep(&reviews()).unwrap().tidy();
    assert_eq!(after.len(), 2);
    assert!(after
        .iter()
        .all(|(_, row)| row.value.as_deref() == Some("snowball")));
    assert_eq!(before[0].1.id, after[0].1.id);
}

#[test]
fn recipe_print_lists_each_step() {
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("title_tok")]))
        .unwrap()
        .add_step(StemStep::new(vec![Selector::name("body_tok")]))
        .unwrap();

    let mut buf = Vec::new();
    recipe.print(&mut buf, 60).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("Stemming for title_tok"));
    assert!(text.contains("Stemming for body_tok"));
    assert!(!text.contains("[trained]"));
}

#[test]
fn recipe_print_is_plain_text_even_with_color_forced() {
    colored::control::set_override(true);
    let recipe = Recipe::new()
        .add_step(StemStep::new(vec![Selector::name("title_tok")]))
        .unwrap();

    let mut buf = Vec::new();
    recipe.print(&mut buf, 60).unwrap();
    colored::control::unset_override();

    let text = String::from_utf8(buf).unwrap();
    assert!(!text.contains('\x1b'), "escape codes in {text:?}");
    assert!(text.starts_with("Operations:\n"));
}

// ============================================================
// Persistence of a trained step
// ============================================================

#[test]
fn trained_step_survives_json() {
    let data = reviews();
    let step = StemStep::new(vec![Selector::name("body_tok")])
        .train(&data, &Schema::from_dataset(&data))
        .unwrap();

    let json = serde_json::to_string(&step).unwrap();
    let restored: StemStep = serde_json::from_str(&json).unwrap();

    assert!(restored.is_trained());
    assert_eq!(restored.step_id(), step.step_id());
    assert_eq!(restored.apply(&data).unwrap(), step.apply(&data).unwrap());
}

#[test]
fn untrained_step_json_keeps_selectors() {
    let step = StemStep::new(vec![
        Selector::EndsWith("_tok".into()),
        Selector::exclude(Selector::name("title_tok")),
    ]);
    let value = serde_json::to_value(&step).unwrap();
    assert_eq!(value["columns"]["state"], "unresolved");
    assert_eq!(value["columns"]["columns"][0], "ends_with(_tok)");
    assert_eq!(value["columns"]["columns"][1], "-title_tok");
    assert_eq!(value["stemmer"], "snowball");

    let data = reviews();
    let restored: StemStep = serde_json::from_value(value).unwrap();
    let trained = restored.train(&data, &Schema::from_dataset(&data)).unwrap();
    assert_eq!(
        trained.selected_columns(),
        Some(&["body_tok".to_string()][..])
    );
}

#[test]
fn dataset_json_roundtrip_after_bake() {
    let data = reviews();
    let step = StemStep::new(vec![Selector::name("body_tok")])
        .train(&data, &Schema::from_dataset(&data))
        .unwrap();
    let baked = step.apply(&data).unwrap();

    let json = serde_json::to_string(&baked).unwrap();
    let back = Dataset::from_json(&json).unwrap();
    assert_eq!(back, baked);
}
