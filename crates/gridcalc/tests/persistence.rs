//! Integration tests for saving and loading tables

use gridcalc::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn pos(text: &str) -> Position {
    text.parse().unwrap()
}

fn sample() -> Table {
    let mut table = Table::new();
    table.set_cell(pos("A1"), "10").unwrap();
    table.set_cell(pos("B1"), "=A1+1").unwrap();
    table.set_cell(pos("C3"), "say \"hi\"|").unwrap();
    table.set_cell(pos("D4"), "=$A$1*B$1-(-$C3)").unwrap();
    table
}

fn assert_same_cells(left: &Table, right: &Table) {
    assert_eq!(left.positions(), right.positions());
    for at in left.positions() {
        assert_eq!(left.get_value(at), right.get_value(at), "{}", at);
        assert_eq!(left.get_cell(at).to_string(), right.get_cell(at).to_string());
    }
}

#[test]
fn test_two_cell_round_trip() {
    let mut table = Table::new();
    table.set_cell(pos("A1"), "10").unwrap();
    table.set_cell(pos("B1"), "=A1+1").unwrap();

    let mut buf = Vec::new();
    table.save(&mut buf).unwrap();

    let mut loaded = Table::new();
    loaded.load(buf.as_slice()).unwrap();
    assert_eq!(loaded.get_value(pos("A1")), ContentValue::Number(10.0));
    assert_eq!(loaded.get_value(pos("B1")), ContentValue::Number(11.0));
}

#[test]
fn test_round_trip_keeps_formulas_and_markers() {
    let table = sample();

    let mut buf = Vec::new();
    table.save(&mut buf).unwrap();

    let mut loaded = Table::new();
    loaded.load(buf.as_slice()).unwrap();
    assert_same_cells(&table, &loaded);
    assert_eq!(
        loaded.get_cell(pos("D4")).to_string(),
        "(($A$1*B$1)-(-$C3))"
    );
}

#[test]
fn test_save_is_deterministic() {
    let mut first = Vec::new();
    sample().save(&mut first).unwrap();

    let mut second = Vec::new();
    let mut reloaded = Table::new();
    reloaded.load(first.as_slice()).unwrap();
    reloaded.save(&mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_load_replaces_existing_cells() {
    let mut table = Table::new();
    table.set_cell(pos("Z9"), "old").unwrap();
    table.load("1|2|A1|2|=5|".as_bytes()).unwrap();

    assert_eq!(table.positions(), vec![pos("A1")]);
}

#[test]
fn test_failed_load_leaves_empty_table() {
    let mut buf = Vec::new();
    sample().save(&mut buf).unwrap();
    buf.truncate(buf.len() - 1);

    let mut table = sample();
    let err = table.load(buf.as_slice()).unwrap_err();
    assert!(matches!(err, Error::StreamFormat(_)));
    assert!(table.is_empty());
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.grid");

    let table = sample();
    table.save_file(&path).unwrap();

    let mut loaded = Table::new();
    loaded.load_file(&path).unwrap();
    assert_same_cells(&table, &loaded);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut table = sample();

    let err = table.load_file(dir.path().join("missing.grid")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(table.is_empty());
}

#[test]
fn test_custom_separator_round_trip() {
    let options = RecordOptions { separator: b'\t' };
    let table = sample();

    let mut buf = Vec::new();
    RecordWriter::write(&table, &mut buf, &options).unwrap();

    let mut loaded = Table::new();
    RecordReader::read(&mut loaded, buf.as_slice(), &options).unwrap();
    assert_same_cells(&table, &loaded);

    // The default separator does not accept it
    assert!(Table::new().load(buf.as_slice()).is_err());
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    fn contents() -> impl Strategy<Value = String> {
        prop_oneof![
            (-10_000i32..10_000).prop_map(|n| (n as f64 / 8.0).to_string()),
            "[a-z|\" ]{0,6}",
            (1u32..6, 0u32..6, 1u32..6).prop_map(|(r, c, k)| {
                format!("=${}{}*{}", Position::column_to_letters(c), r, k)
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_save_load_preserves_values(
            cells in proptest::collection::vec(((1u32..6, 0u32..6), contents()), 0..20)
        ) {
            let mut table = Table::new();
            for ((row, col), text) in &cells {
                table.set_cell(Position::new(*row, *col), text).unwrap();
            }

            let mut buf = Vec::new();
            table.save(&mut buf).unwrap();
            let mut loaded = Table::new();
            loaded.load(buf.as_slice()).unwrap();

            prop_assert_eq!(table.positions(), loaded.positions());
            for at in table.positions() {
                prop_assert_eq!(table.get_value(at), loaded.get_value(at));
            }
        }
    }
}
