use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{Error, Result};

use super::rows::{COLUMNS, Cell};

/// Lets spreadsheet applications detect UTF-8 regardless of system locale.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Comma-separated, header first, CRLF line endings, BOM prefixed.
pub fn encode(rows: &[Vec<Cell>]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(UTF8_BOM.len() + 256 * (rows.len() + 1));
    buf.extend_from_slice(UTF8_BOM);

    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(buf);

    writer
        .write_record(COLUMNS)
        .map_err(|e| Error::export_with("Failed to write CSV header", e))?;

    for (i, row) in rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|e| Error::export_with(format!("Failed to write CSV row {}", i + 1), e))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::export_with("Failed to flush CSV output", e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        export::{ExportConfig, rows::project_all},
        model::{
            AiInsight,
            fixtures::{at, record},
        },
    };

    #[test]
    fn empty_export_is_bom_plus_header() {
        let bytes = encode(&[]).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert!(text.starts_with("Date/Time,City,State,Country,"));
        assert!(text.ends_with("AI Generated At\r\n"));
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let mut rec = record("Rio de Janeiro", at(14), 31.0);
        rec.current.condition = "Cloudy, light rain".into();
        rec.ai_insight = Some(AiInsight {
            summary: "He said \"hot\"".into(),
            alerts: vec!["a".into()],
            recommendations: vec!["b".into()],
            trends: "flat".into(),
            generated_at: at(15),
        });

        let rows = project_all(&[rec], &ExportConfig::default()).unwrap();
        let text = String::from_utf8(encode(&rows).unwrap()).unwrap();

        assert!(text.contains(",\"Cloudy, light rain\","));
        assert!(text.contains(",\"He said \"\"hot\"\"\","));
    }

    #[test]
    fn rows_round_trip_through_a_csv_reader() {
        let mut second = record("Rio de Janeiro", at(16), 29.5);
        second.ai_insight = Some(AiInsight {
            summary: "Humid, breezy".into(),
            alerts: vec!["Heat index".into(), "Sea breeze".into()],
            recommendations: vec!["Hydrate".into()],
            trends: "Cooling".into(),
            generated_at: at(17),
        });
        let records = vec![record("Niterói", at(14), 31.0), second];

        let rows = project_all(&records, &ExportConfig::default()).unwrap();
        let bytes = encode(&rows).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&bytes[UTF8_BOM.len()..]);

        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, COLUMNS);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect();

        assert_eq!(parsed, expected);
    }
}
