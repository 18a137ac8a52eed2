//! Spreadsheet export and the inline download link.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::table::{DATE, PriceTable};

pub const SHEET_NAME: &str = "Sheet1";
pub const FILE_NAME: &str = "download.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Encodes the table as an `.xlsx` workbook with a single `Sheet1`.
///
/// Row 0 holds `Date` and the column names. Dates are real Excel dates
/// (`yyyy-mm-dd`), missing values are left as empty cells.
pub fn to_excel(table: &PriceTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.set_column_width(0, 12)?;

    sheet.write_string_with_format(0, 0, DATE, &header)?;
    for (col, name) in table.column_names().enumerate() {
        sheet.write_string_with_format(0, col as u16 + 1, name, &header)?;
    }

    for (i, (date, values)) in table.rows().enumerate() {
        let row = i as u32 + 1;
        let excel_date =
            ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
        sheet.write_datetime_with_format(row, 0, &excel_date, &date_format)?;
        for (col, value) in values.into_iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(row, col as u16 + 1, v)?;
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = table.len(), bytes = bytes.len(), "encoded workbook");
    Ok(bytes)
}

/// A `data:` URI link carrying the whole workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub file_name: String,
    pub label: String,
    pub href: String,
}

impl DownloadLink {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            file_name: FILE_NAME.to_string(),
            label: "Download excel file".to_string(),
            href: format!(
                "data:application/octet-stream;base64,{}",
                STANDARD.encode(bytes)
            ),
        }
    }

    /// The anchor element. Base64 and the fixed file name need no escaping.
    pub fn to_html(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">{}</a>"#,
            self.href, self.file_name, self.label
        )
    }
}

/// Encodes the table and wraps it in a [`DownloadLink`].
pub fn download_link(table: &PriceTable) -> Result<DownloadLink, ExportError> {
    Ok(DownloadLink::from_bytes(&to_excel(table)?))
}
