use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use specs_rank::{rank, write_best, RankError, RankSettings, Table};
use tempfile::TempDir;

const HEADER: &str = "make,model,year,city,highway,fuel tank capacity,max cargo capacity";

fn write_csv(dir: &Path, name: &str, rows: &[&str]) {
    let mut content = format!("{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join(name), content).unwrap();
}

fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_csv(
        temp.path(),
        "acura_specs.csv",
        &[
            "Acura,RDX,2023,21 mpg,28 mpg,17.1 gal.,58.8 cu.ft.",
            "Acura,MDX,2023,,,18.5 gal.,",
        ],
    );
    write_csv(
        temp.path(),
        "kia_specs.csv",
        &["Kia,Sorento,2021,24 mpg,29 mpg,17.7 gal.,75.5 cu.ft."],
    );
    fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
    temp
}

fn makes(table: &Table, rows: &[&specs_rank::RankedRow]) -> Vec<String> {
    rows.iter()
        .map(|r| format!("{} {}", table.row(r.row).unwrap()[0], table.row(r.row).unwrap()[1]))
        .collect()
}

#[test]
fn loads_every_csv_in_file_name_order() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.headers().len(), 7);
    assert_eq!(table.row(2).unwrap()[1], "Sorento");
}

#[test]
fn headers_are_merged_across_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.csv"), "make,city\nAudi,20 mpg\n").unwrap();
    fs::write(temp.path().join("b.csv"), "make,torque\nBMW,300\n").unwrap();

    let table = Table::load_dir(temp.path()).unwrap();
    assert_eq!(table.headers(), ["make", "city", "torque"]);
    assert_eq!(table.row(0).unwrap(), ["Audi", "20 mpg", ""]);
    assert_eq!(table.row(1).unwrap(), ["BMW", "", "300"]);
}

#[test]
fn empty_input_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        Table::load_dir(temp.path()),
        Err(RankError::NoInput(_))
    ));
}

#[test]
fn rows_with_more_and_larger_values_rank_higher() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();
    let ranking = rank(&table, &RankSettings::default()).unwrap();

    let order: Vec<_> = ranking.rows().iter().collect();
    assert_eq!(
        makes(&table, &order),
        vec!["Kia Sorento", "Acura RDX", "Acura MDX"]
    );
    assert!(ranking.rows()[0].score > ranking.rows()[1].score);
}

#[test]
fn holes_are_penalized_with_negated_column_max() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();
    let ranking = rank(&table, &RankSettings::default()).unwrap();

    let mdx = ranking.rows().iter().find(|r| r.row == 1).unwrap();
    assert_eq!(mdx.values[0], None);
    assert_eq!(mdx.penalized[0], -24.0);
    assert_eq!(mdx.penalized[3], -75.5);
    assert_eq!(mdx.normalized[0], 0.0);
    assert!(mdx.is_missing(1));

    assert_eq!(
        ranking.missing_counts(),
        vec![
            ("city".to_string(), 1),
            ("highway".to_string(), 1),
            ("fuel tank capacity".to_string(), 0),
            ("max cargo capacity".to_string(), 1),
        ]
    );
}

#[test]
fn constant_columns_and_ties_are_stable() {
    let mut table = Table::new(vec!["make".into(), "city".into()]);
    for make in ["A", "B", "C"] {
        table.push_row(vec![make.into(), "20 mpg".into()]);
    }
    let settings = RankSettings {
        columns: vec!["city".into()],
        ..RankSettings::default()
    };

    let ranking = rank(&table, &settings).unwrap();
    let rows: Vec<_> = ranking.rows().iter().map(|r| (r.row, r.score)).collect();
    assert_eq!(rows, vec![(0, 0.0), (1, 0.0), (2, 0.0)]);
}

#[test]
fn unknown_column_is_rejected() {
    let table = Table::new(vec!["make".into()]);
    assert!(matches!(
        rank(&table, &RankSettings::default()),
        Err(RankError::MissingColumn(name)) if name == "city"
    ));
}

#[test]
fn top_by_column_orders_on_that_attribute() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();
    let ranking = rank(&table, &RankSettings::default()).unwrap();

    let tanks = ranking.top_by_column("fuel tank capacity", 2).unwrap();
    assert_eq!(makes(&table, &tanks), vec!["Acura MDX", "Kia Sorento"]);

    let cargo = ranking.top_by_column("max cargo capacity", 10).unwrap();
    assert_eq!(
        makes(&table, &cargo),
        vec!["Kia Sorento", "Acura RDX", "Acura MDX"]
    );
    assert!(ranking.top_by_column("torque", 1).is_err());
}

#[test]
fn best_picks_are_written_with_rank_and_score() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();
    let settings = RankSettings {
        top_n: 2,
        missing_marker: "n/a".into(),
        ..RankSettings::default()
    };
    let ranking = rank(&table, &settings).unwrap();
    let output = temp.path().join("output").join("best_cars_for_me.csv");

    let path = write_best(&table, &ranking, &settings, &output).unwrap();
    assert_eq!(path, output);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers.first().map(String::as_str), Some("rank"));
    assert_eq!(headers.last().map(String::as_str), Some("score"));

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][2], "Sorento");
    assert_eq!(&rows[0][4], "24");
    assert_eq!(&rows[1][7], "58.8");
}

#[test]
fn missing_marker_replaces_penalties_in_output() {
    let temp = fixture();
    let table = Table::load_dir(temp.path()).unwrap();
    let settings = RankSettings {
        missing_marker: "n/a".into(),
        ..RankSettings::default()
    };
    let ranking = rank(&table, &settings).unwrap();
    let output = temp.path().join("best.csv");

    write_best(&table, &ranking, &settings, &output).unwrap();
    let content = fs::read_to_string(&output).unwrap();
    let last = content.lines().last().unwrap();

    assert!(last.starts_with("3,Acura,MDX,2023,n/a,n/a,18.5,n/a,"));
    assert!(!content.contains("-24"));
}
