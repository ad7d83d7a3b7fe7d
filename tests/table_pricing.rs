use std::collections::BTreeMap;

use approx::assert_relative_eq;
use cylinder_pricing::table_pricing::{
    calculate_table_price, load_table, save_table, LengthBasis, PriceColumn, PriceOption,
    PriceTable, PriceUnit, SelectionStatus, TablePricingError, TableSettings,
};

fn sample_table() -> PriceTable {
    let mut table = PriceTable {
        columns: vec![
            PriceColumn::new(
                "Gövde Borusu",
                PriceUnit::PerMeter {
                    basis: LengthBasis::Tube,
                },
            )
            .with_option(PriceOption::new("Ø63", 310.0))
            .with_option(PriceOption::new("Ø80", 395.0)),
            PriceColumn::new(
                "Piston Mili",
                PriceUnit::PerMeter {
                    basis: LengthBasis::Rod,
                },
            )
            .with_option(PriceOption::new("Ø36", 180.0)),
            PriceColumn::new("Ön Kapak", PriceUnit::PerItem)
                .with_option(PriceOption::new("Flanşlı", 240.0))
                .with_option(PriceOption::new("YOK", 0.0)),
            PriceColumn::new("Sensör", PriceUnit::PerItem)
                .with_option(PriceOption::new("Endüktif", 150.0)),
        ],
        metadata: BTreeMap::new(),
    };
    table
        .metadata
        .insert("currency".to_string(), "TRY".to_string());
    table
}

fn select(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn column_names_are_slugs() {
    let table = sample_table();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["govde_borusu", "piston_mili", "on_kapak", "sensor"]);
}

#[test]
fn full_selection_quote() {
    let quote = calculate_table_price(
        &sample_table(),
        &select(&[
            ("govde_borusu", "Ø80"),
            ("piston_mili", "Ø36"),
            ("on_kapak", "YOK"),
        ]),
        400.0,
        &TableSettings::default(),
    )
    .unwrap();

    assert_eq!(quote.items.len(), 3);
    // (400 + 120) mm × 395/m, (400 + 150) mm × 180/m
    assert_relative_eq!(quote.items[0].price, 0.52 * 395.0, max_relative = 1e-12);
    assert_relative_eq!(quote.items[1].price, 0.55 * 180.0, max_relative = 1e-12);
    assert_eq!(quote.items[2].status, SelectionStatus::SelectedFree);
    assert_eq!(quote.items[2].price, 0.0);
    assert_eq!(quote.not_applicable, vec!["Sensör".to_string()]);
    assert_relative_eq!(quote.total, 0.52 * 395.0 + 0.55 * 180.0, max_relative = 1e-12);
}

#[test]
fn custom_offsets_apply() {
    let settings = TableSettings {
        tube_offset_mm: 0.0,
        rod_offset_mm: 0.0,
    };
    let quote = calculate_table_price(
        &sample_table(),
        &select(&[("govde_borusu", "Ø63")]),
        1000.0,
        &settings,
    )
    .unwrap();
    assert_relative_eq!(quote.total, 310.0, max_relative = 1e-12);
}

#[test]
fn per_item_only_selection_needs_no_stroke() {
    let quote = calculate_table_price(
        &sample_table(),
        &select(&[("on_kapak", "Flanşlı"), ("sensor", "Endüktif")]),
        0.0,
        &TableSettings::default(),
    )
    .unwrap();
    assert_eq!(quote.total, 390.0);
    assert!(quote
        .items
        .iter()
        .all(|i| i.status == SelectionStatus::Priced && i.length_m.is_none()));
}

#[test]
fn table_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price_table.toml");
    let table = sample_table();
    save_table(&path, &table).unwrap();
    assert_eq!(load_table(&path).unwrap(), table);
}

#[test]
fn negative_price_is_rejected_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = sample_table();
    table.columns[3].options[0].price = -1.0;
    let err = save_table(&dir.path().join("t.toml"), &table).unwrap_err();
    assert!(matches!(err, TablePricingError::InvalidPrice { .. }));
}
