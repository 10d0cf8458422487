//! End-to-end tests for the ingest pipeline
//!
//! Covers CSV and xlsx sources through the public entry points. Workbooks are
//! generated in-process so no binary fixtures live in the repository.

use memories_ingest::{ingest, ingest_with_report, FieldWarning, IngestCache, IngestError};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

// =============================================================================
// CSV
// =============================================================================

#[test]
fn test_csv_trip_scenario_with_quoted_categories() {
    let csv = "id,title,latitude,longitude,date,categories,photo_files\n\
               1,Trip,10.5,20.25,15/03/24,\"travel, fun\",a.jpg,b.jpg\n";

    let memories = ingest(csv.as_bytes(), "memories.csv").unwrap();
    assert_eq!(memories.len(), 1);

    let memory = &memories[0];
    assert_eq!(memory.id, "1");
    assert_eq!(memory.title, "Trip");
    assert_eq!(memory.latitude, 10.5);
    assert_eq!(memory.longitude, 20.25);
    assert_eq!(memory.date, "2024-03-15T00:00:00.000Z");
    assert_eq!(memory.categories, vec!["travel", "fun"]);
    // The trailing field has no header and is dropped
    assert_eq!(memory.photo_files, vec!["a.jpg"]);
    assert_eq!(memory.country, "");
    assert_eq!(memory.identifier, None);
}

#[test]
fn test_csv_unquoted_comma_shifts_columns() {
    let csv = "id,title,latitude,longitude,date,categories,photo_files\n\
               1,Trip,10.5,20.25,15/03/24,travel, fun,a.jpg\n";

    let memory = &ingest(csv.as_bytes(), "memories.csv").unwrap()[0];
    assert_eq!(memory.categories, vec!["travel"]);
    assert_eq!(memory.photo_files, vec!["fun"]);
}

#[test]
fn test_csv_full_row() {
    let csv = "id,title,country,city,latitude,longitude,date,description,tags,identifier,photos,videos,audio\n\
               7,Louvre,France,Paris,48.8606,2.3376,2019-07-04,\"Rainy day, lots of art\",\"art,museum\", east wing ,\"l1.jpg,l2.heic\",walk.mp4,guide.mp3\n";

    let memory = &ingest(csv.as_bytes(), "MEMORIES.CSV").unwrap()[0];
    assert_eq!(memory.id, "7");
    assert_eq!(memory.country, "France");
    assert_eq!(memory.city, "Paris");
    assert_eq!(memory.latitude, 48.8606);
    assert_eq!(memory.longitude, 2.3376);
    assert_eq!(memory.date, "2019-07-04T00:00:00.000Z");
    assert_eq!(memory.description, "Rainy day, lots of art");
    assert_eq!(memory.categories, vec!["art", "museum"]);
    assert_eq!(memory.identifier.as_deref(), Some("east wing"));
    assert_eq!(memory.photo_files, vec!["l1.jpg", "l2.heic"]);
    assert_eq!(memory.video_files, vec!["walk.mp4"]);
    assert_eq!(memory.audio_files, vec!["guide.mp3"]);
}

#[test]
fn test_csv_bad_rows_do_not_abort() {
    let csv = "id,latitude,longitude,date\n\
               1,not-a-number,,Summer 2019\n\
               2,1.0,2.0,01/02/49\n\
               3,x,y,01/02/50\n";

    let report = ingest_with_report(csv.as_bytes(), "memories.csv").unwrap();
    assert_eq!(report.memories.len(), 3);

    assert_eq!(report.memories[0].latitude, 0.0);
    assert_eq!(report.memories[0].date, "Summer 2019");
    assert!(report.memories[1].date.starts_with("2049-02-01"));
    assert!(report.memories[2].date.starts_with("1950-02-01"));

    let row_zero: Vec<_> = report.warnings.iter().filter(|w| w.row == 0).collect();
    assert_eq!(row_zero.len(), 3);
    assert!(row_zero.iter().any(|w| w.warning == FieldWarning::MissingCoordinate { field: "longitude" }));
    assert!(report.warnings.iter().all(|w| w.row != 1));
    assert_eq!(report.warnings.iter().filter(|w| w.row == 2).count(), 2);
}

#[test]
fn test_csv_semicolon_export() {
    let csv = "id;title;latitude;longitude;date;categories\n\
               1;Trip;10.5;20.25;15/03/24;\"travel, fun\"\n";

    let memory = &ingest(csv.as_bytes(), "memories.csv").unwrap()[0];
    assert_eq!(memory.id, "1");
    assert_eq!(memory.title, "Trip");
    assert_eq!(memory.latitude, 10.5);
    assert_eq!(memory.longitude, 20.25);
    assert_eq!(memory.date, "2024-03-15T00:00:00.000Z");
    assert_eq!(memory.categories, vec!["travel", "fun"]);
}

#[test]
fn test_csv_tab_separated() {
    let tsv = "id\ttitle\tlatitude\tphoto_files\n\
               9\tLake\t-1.25\ta.jpg, b.jpg\n";

    let memory = &ingest(tsv.as_bytes(), "memories.csv").unwrap()[0];
    assert_eq!(memory.id, "9");
    assert_eq!(memory.title, "Lake");
    assert_eq!(memory.latitude, -1.25);
    assert_eq!(memory.photo_files, vec!["a.jpg", "b.jpg"]);
}

#[test]
fn test_rejects_unsupported_extension() {
    let err = ingest(b"%PDF-1.4", "memories.pdf").unwrap_err();
    assert_eq!(
        err,
        IngestError::UnsupportedFormat {
            filename: "memories.pdf".to_string()
        }
    );
    assert!(err.to_string().contains(".xlsx, .xls, or .csv"));
}

// =============================================================================
// Spreadsheets
// =============================================================================

fn sample_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    let sheet = workbook.add_worksheet();
    let headers = ["id", "title", "latitude", "longitude", "date", "Categories", "photoFiles"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    sheet.write_number(1, 0, 1.0).unwrap();
    sheet.write_string(1, 1, "Harbour").unwrap();
    sheet.write_number(1, 2, -33.8568).unwrap();
    sheet.write_number(1, 3, 151.2153).unwrap();
    let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
    sheet.write_datetime_with_format(1, 4, &date, &date_format).unwrap();
    sheet.write_string(1, 5, "travel, fun").unwrap();
    sheet.write_string(1, 6, "a.jpg, b.jpg").unwrap();

    // Row 2 left blank on purpose

    sheet.write_string(3, 0, "2").unwrap();
    sheet.write_string(3, 1, "Old photo").unwrap();
    sheet.write_string(3, 2, "oops").unwrap();
    sheet.write_string(3, 4, "05/06/85").unwrap();

    let other = workbook.add_worksheet();
    other.write_string(0, 0, "id").unwrap();
    other.write_string(1, 0, "ignored").unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_xlsx_first_sheet_only() {
    let memories = ingest(&sample_workbook(), "memories.xlsx").unwrap();
    let ids: Vec<_> = memories.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn test_xlsx_typed_cells() {
    let memories = ingest(&sample_workbook(), "memories.xlsx").unwrap();

    let first = &memories[0];
    assert_eq!(first.title, "Harbour");
    assert_eq!(first.latitude, -33.8568);
    assert_eq!(first.longitude, 151.2153);
    assert!(first.date.starts_with("2024-03-15"));
    assert_eq!(first.categories, vec!["travel", "fun"]);
    assert_eq!(first.photo_files, vec!["a.jpg", "b.jpg"]);

    let second = &memories[1];
    assert_eq!(second.latitude, 0.0);
    assert_eq!(second.longitude, 0.0);
    assert_eq!(second.date, "1985-06-05T00:00:00.000Z");
    assert!(second.categories.is_empty());
}

#[test]
fn test_xls_name_with_xlsx_content() {
    // The container is sniffed, so the extension only has to be a spreadsheet one
    let memories = ingest(&sample_workbook(), "memories.xls").unwrap();
    assert_eq!(memories.len(), 2);
}

#[test]
fn test_corrupt_workbook_is_malformed() {
    let err = ingest(b"id,title\n1,csv in disguise\n", "memories.xlsx").unwrap_err();
    assert!(matches!(err, IngestError::Malformed { .. }));
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn test_cache_matches_uncached_ingest() {
    let bytes = sample_workbook();
    let cache = IngestCache::default();

    let cached = cache.get_or_ingest(&bytes, "memories.xlsx").unwrap();
    let direct = ingest_with_report(&bytes, "memories.xlsx").unwrap();
    assert_eq!(*cached, direct);
}
