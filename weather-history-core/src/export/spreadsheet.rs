use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::{Error, Result};

use super::{
    ExportConfig,
    rows::{COLUMNS, Cell},
};

/// Single-sheet workbook: bold header row, one row per record, uniform column width.
pub fn encode(rows: &[Vec<Cell>], config: &ExportConfig) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), rows, config)
        .map_err(|e| Error::export_with("Failed to build XLSX sheet", e))?;

    workbook
        .save_to_buffer()
        .map_err(|e| Error::export_with("Failed to encode XLSX workbook", e))
}

fn fill_sheet(
    sheet: &mut Worksheet,
    rows: &[Vec<Cell>],
    config: &ExportConfig,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(&config.sheet_name)?;

    let header = Format::new().set_bold();
    for (col, label) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *label, &header)?;
        sheet.set_column_width(col, config.column_width)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => sheet.write_string(r, col, s)?,
                Cell::Number(n) => sheet.write_number(r, col, *n)?,
            };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        export::rows::project_all,
        model::fixtures::{at, record},
    };
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use std::io::{Cursor, Read};

    const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

    fn open(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap()
    }

    fn sheet_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    /// `(min, max, width)` of every `<col>` element.
    fn col_specs(xml: &str) -> Vec<(u16, u16, f64)> {
        let attr = |tag: &str, name: &str| -> String {
            let start = tag.find(&format!("{name}=\"")).unwrap() + name.len() + 2;
            tag[start..].split('"').next().unwrap().to_string()
        };

        xml.split("<col ")
            .skip(1)
            .map(|rest| {
                let tag = rest.split("/>").next().unwrap();
                (
                    attr(tag, "min").parse().unwrap(),
                    attr(tag, "max").parse().unwrap(),
                    attr(tag, "width").parse().unwrap(),
                )
            })
            .collect()
    }

    fn header_labels(range: &calamine::Range<Data>) -> Vec<String> {
        (0..COLUMNS.len() as u32)
            .map(|c| range.get_value((0, c)).unwrap().to_string())
            .collect()
    }

    #[test]
    fn empty_export_is_header_only() {
        let bytes = encode(&[], &ExportConfig::default()).unwrap();
        assert!(bytes.starts_with(ZIP_MAGIC));

        let mut workbook = open(&bytes);
        assert_eq!(workbook.sheet_names(), vec!["Weather Data".to_string()]);

        let range = workbook.worksheet_range("Weather Data").unwrap();
        assert_eq!(range.height(), 1);
        assert_eq!(header_labels(&range), COLUMNS);
    }

    #[test]
    fn records_become_rows_under_the_header() {
        let records = vec![record("Brasília", at(10), 26.0), record("Brasília", at(11), 27.5)];
        let cfg = ExportConfig {
            column_width: 32.0,
            sheet_name: "Planalto".into(),
            ..ExportConfig::default()
        };
        let rows = project_all(&records, &cfg).unwrap();

        let bytes = encode(&rows, &cfg).unwrap();
        let mut workbook = open(&bytes);
        assert_eq!(workbook.sheet_names(), vec!["Planalto".to_string()]);

        let range = workbook.worksheet_range("Planalto").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), COLUMNS.len());
        assert_eq!(header_labels(&range), COLUMNS);
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Brasília".into())));

        let temperature = COLUMNS.iter().position(|c| c.starts_with("Temperature")).unwrap() as u32;
        assert_eq!(range.get_value((2, temperature)), Some(&Data::Float(27.5)));
    }

    #[test]
    fn every_column_gets_the_configured_width() {
        let cfg = ExportConfig {
            column_width: 32.0,
            ..ExportConfig::default()
        };
        let bytes = encode(&[], &cfg).unwrap();
        let specs = col_specs(&sheet_xml(&bytes));

        let mut covered: Vec<u16> = specs.iter().flat_map(|&(min, max, _)| min..=max).collect();
        covered.sort_unstable();
        assert_eq!(covered, (1..=COLUMNS.len() as u16).collect::<Vec<_>>());
        assert!(specs.iter().all(|&(_, _, w)| (32.0..33.0).contains(&w)), "{specs:?}");
    }

    #[test]
    fn invalid_sheet_name_is_export_failure() {
        use std::error::Error as _;

        let cfg = ExportConfig {
            sheet_name: "bad/name[]".into(),
            ..ExportConfig::default()
        };
        let err = encode(&[], &cfg).unwrap_err();

        assert!(matches!(err, Error::ExportFailed { .. }));
        assert!(err.source().is_some());
    }
}
