use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::SlikError;
use crate::export::TableSink;
use crate::model::{CellValue, Table};

const MAX_COLUMN_WIDTH: usize = 60;

// cellXfs indices in STYLES
const STYLE_HEADER: u32 = 1;
const STYLE_EVEN: u32 = 2;
const STYLE_ODD: u32 = 3;
const STYLE_EVEN_DATE: u32 = 4;
const STYLE_ODD_DATE: u32 = 5;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="SLIK" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font></fonts><fills count="4"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF1F4E78"/><bgColor indexed="64"/></patternFill></fill><fill><patternFill patternType="solid"><fgColor rgb="FFDDEBF7"/><bgColor indexed="64"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"><color auto="1"/></left><right style="thin"><color auto="1"/></right><top style="thin"><color auto="1"/></top><bottom style="thin"><color auto="1"/></bottom><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="6"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1"/><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1"/><xf numFmtId="0" fontId="0" fillId="3" borderId="1" xfId="0" applyFill="1" applyBorder="1"/><xf numFmtId="164" fontId="0" fillId="0" borderId="1" xfId="0" applyNumberFormat="1" applyBorder="1"/><xf numFmtId="164" fontId="0" fillId="3" borderId="1" xfId="0" applyNumberFormat="1" applyFill="1" applyBorder="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Writes the unified table as a single-sheet xlsx workbook.
///
/// The header row is bold on a dark fill, data rows alternate fills by
/// parity, every cell is bordered and column widths follow content.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSink;

impl XlsxSink {
    pub fn new() -> Self {
        XlsxSink
    }

    /// Build the workbook in memory.
    pub fn to_bytes(&self, table: &Table) -> Result<Vec<u8>, SlikError> {
        let sheet = sheet_xml(table)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let parts: [(&str, &[u8]); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/styles.xml", STYLES.as_bytes()),
            ("xl/worksheets/sheet1.xml", &sheet),
        ];
        for (name, data) in parts {
            zip.start_file(name, options)
                .map_err(|e| SlikError::Export(format!("{name}: {e}")))?;
            zip.write_all(data)?;
        }
        let cursor = zip
            .finish()
            .map_err(|e| SlikError::Export(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

impl TableSink for XlsxSink {
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), SlikError> {
        let bytes = self.to_bytes(table)?;

        // Write next to the target and rename, so a failed run leaves no partial file.
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(path).map_err(|e| SlikError::Io(e.error))?;

        info!(path = %path.display(), rows = table.len(), "spreadsheet written");
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "xlsx"
    }
}

fn put(w: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SlikError> {
    w.write_event(event)
        .map_err(|e| SlikError::Export(e.to_string()))
}

fn sheet_xml(table: &Table) -> Result<Vec<u8>, SlikError> {
    let mut w = Writer::new(Vec::new());

    put(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    put(
        &mut w,
        Event::Start(BytesStart::new("worksheet").with_attributes([(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        )])),
    )?;

    // Frozen header row
    put(&mut w, Event::Start(BytesStart::new("sheetViews")))?;
    put(
        &mut w,
        Event::Start(BytesStart::new("sheetView").with_attributes([("workbookViewId", "0")])),
    )?;
    put(
        &mut w,
        Event::Empty(BytesStart::new("pane").with_attributes([
            ("ySplit", "1"),
            ("topLeftCell", "A2"),
            ("activePane", "bottomLeft"),
            ("state", "frozen"),
        ])),
    )?;
    put(&mut w, Event::End(BytesEnd::new("sheetView")))?;
    put(&mut w, Event::End(BytesEnd::new("sheetViews")))?;

    if !table.columns.is_empty() {
        put(&mut w, Event::Start(BytesStart::new("cols")))?;
        for (idx, width) in column_widths(table).into_iter().enumerate() {
            let n = (idx + 1).to_string();
            let width = width.to_string();
            put(
                &mut w,
                Event::Empty(BytesStart::new("col").with_attributes([
                    ("min", n.as_str()),
                    ("max", n.as_str()),
                    ("width", width.as_str()),
                    ("customWidth", "1"),
                ])),
            )?;
        }
        put(&mut w, Event::End(BytesEnd::new("cols")))?;
    }

    put(&mut w, Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<CellValue> = table
        .columns
        .iter()
        .map(|c| CellValue::Text(c.header().to_string()))
        .collect();
    write_row(&mut w, 1, &header, |_| STYLE_HEADER)?;

    for (i, row) in table.rows.iter().enumerate() {
        let odd = i % 2 == 1;
        write_row(&mut w, i + 2, row, |cell| match (cell, odd) {
            (CellValue::Date(_), false) => STYLE_EVEN_DATE,
            (CellValue::Date(_), true) => STYLE_ODD_DATE,
            (_, false) => STYLE_EVEN,
            (_, true) => STYLE_ODD,
        })?;
    }

    put(&mut w, Event::End(BytesEnd::new("sheetData")))?;
    put(&mut w, Event::End(BytesEnd::new("worksheet")))?;
    Ok(w.into_inner())
}

fn write_row(
    w: &mut Writer<Vec<u8>>,
    row_number: usize,
    cells: &[CellValue],
    style: impl Fn(&CellValue) -> u32,
) -> Result<(), SlikError> {
    let r = row_number.to_string();
    put(w, Event::Start(BytesStart::new("row").with_attributes([("r", r.as_str())])))?;

    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{row_number}", column_letter(col));
        let s = style(cell).to_string();
        let mut start = BytesStart::new("c");
        start.push_attribute(("r", reference.as_str()));
        start.push_attribute(("s", s.as_str()));

        match cell {
            CellValue::Empty => put(w, Event::Empty(start))?,
            CellValue::Text(text) => {
                start.push_attribute(("t", "inlineStr"));
                put(w, Event::Start(start))?;
                put(w, Event::Start(BytesStart::new("is")))?;
                put(
                    w,
                    Event::Start(BytesStart::new("t").with_attributes([("xml:space", "preserve")])),
                )?;
                put(w, Event::Text(BytesText::new(text)))?;
                put(w, Event::End(BytesEnd::new("t")))?;
                put(w, Event::End(BytesEnd::new("is")))?;
                put(w, Event::End(BytesEnd::new("c")))?;
            }
            CellValue::Number(_) | CellValue::Date(_) => {
                let value = match cell {
                    CellValue::Date(d) => excel_serial(*d).to_string(),
                    other => other.to_string(),
                };
                put(w, Event::Start(start))?;
                put(w, Event::Start(BytesStart::new("v")))?;
                put(w, Event::Text(BytesText::new(&value)))?;
                put(w, Event::End(BytesEnd::new("v")))?;
                put(w, Event::End(BytesEnd::new("c")))?;
            }
        }
    }

    put(w, Event::End(BytesEnd::new("row")))
}

/// Spreadsheet column name for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letter(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Days since the spreadsheet epoch (1899-12-30).
fn excel_serial(date: NaiveDate) -> i64 {
    // 1899-12-30 is day 693594 of the common era
    i64::from(date.num_days_from_ce()) - 693_594
}

fn column_widths(table: &Table) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| match cell {
                    // shown as dd/mm/yyyy
                    CellValue::Date(_) => 10,
                    other => other.to_string().chars().count(),
                })
                .chain(std::iter::once(column.header().chars().count()))
                .max()
                .unwrap_or(0);
            (longest + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use calamine::{Data, Reader, Xlsx};
    use rust_decimal_macros::dec;

    fn sample() -> Table {
        Table {
            columns: vec![Column::Category, Column::Balance, Column::MaturityDate],
            rows: vec![
                vec![
                    CellValue::Text("Kredit/Pembiayaan".into()),
                    CellValue::Number(dec!(1500000)),
                    CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
                ],
                vec![
                    CellValue::Text("Garansi & <L/C>".into()),
                    CellValue::Empty,
                    CellValue::Empty,
                ],
            ],
        }
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(53), "BB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial(NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()), 61);
        assert_eq!(excel_serial(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()), 45322);
    }

    #[test]
    fn test_column_widths_capped() {
        let mut table = sample();
        table.rows[1][0] = CellValue::Text("x".repeat(200));
        let widths = column_widths(&table);
        assert_eq!(widths[0], MAX_COLUMN_WIDTH);
        assert_eq!(widths[2], "Tanggal Jatuh Tempo".len() + 2);
    }

    #[test]
    fn test_sheet_styles_by_parity() {
        let xml = String::from_utf8(sheet_xml(&sample()).unwrap()).unwrap();
        assert!(xml.contains(r#"<c r="A1" s="1" t="inlineStr">"#));
        assert!(xml.contains(r#"<c r="B2" s="2"><v>1500000</v></c>"#));
        assert!(xml.contains(r#"<c r="C2" s="4"><v>45322</v></c>"#));
        assert!(xml.contains(r#"<c r="B3" s="3"/>"#));
        assert!(xml.contains("Garansi &amp; &lt;L/C&gt;"));
    }

    #[test]
    fn test_workbook_reads_back() {
        let bytes = XlsxSink::new().to_bytes(&sample()).unwrap();
        let mut wb: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = wb.worksheet_range_at(0).unwrap().unwrap();

        assert_eq!(
            range.get_value((0, 1)),
            Some(&Data::String("Baki Debet/Nominal".into()))
        );
        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String("Kredit/Pembiayaan".into()))
        );
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(1500000.0)));
        assert_eq!(
            range.get_value((2, 0)),
            Some(&Data::String("Garansi & <L/C>".into()))
        );
    }

    #[test]
    fn test_write_table_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slik.xlsx");
        XlsxSink::new().write_table(&sample(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(XlsxSink::new().sink_name(), "xlsx");
    }
}
