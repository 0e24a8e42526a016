//! Statement PDF rendering.
//!
//! Translates a report definition and its data rows into `genpdf` elements:
//! a logo/institution/title header band, an optional metadata grid, the
//! bordered data table, and a printed-date line on the first page. The band
//! order and column ratios are fixed; they reproduce the bank-statement
//! layout existing clients were built against.

mod decorator;
mod logo;
pub mod style;

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Margins, PaperSize};
use log::warn;

use crate::model::{ColumnSpec, MetaEntry, ReportDefinition, StatementRow};
use decorator::StatementPageDecorator;

pub use style::{MetaGrid, StatementStyle, TextStyle};

/// Footer label; a metadata entry carrying this title suppresses the footer.
pub const PRINTED_DATE_LABEL: &str = "Printed Date";

/// Width ratios for the logo, institution name, and title cells.
const HEADER_BAND_WEIGHTS: [usize; 3] = [1, 3, 2];

/// Width ratios for the four-column metadata grid.
const META_GRID_FOUR: [usize; 4] = [1, 3, 1, 3];

/// Width ratios for the two-column metadata grid.
const META_GRID_TWO: [usize; 2] = [1, 3];

/// Width ratios for the data table, one per canonical row field.
const DATA_TABLE_WEIGHTS: [usize; 8] = [2, 2, 2, 2, 2, 2, 3, 2];

/// Outcome of a render pass.
///
/// `warning` is set when composition failed midway; `bytes` then holds the
/// partial document that was still finalized.
#[derive(Clone, Debug)]
pub struct RenderedStatement {
    pub bytes: Vec<u8>,
    pub warning: Option<String>,
}

/// Renders statement documents under one immutable style configuration.
#[derive(Clone, Debug, Default)]
pub struct StatementRenderer {
    style: StatementStyle,
}

impl StatementRenderer {
    pub fn new(style: StatementStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StatementStyle {
        &self.style
    }

    /// Renders `rows` under `definition` into a finalized PDF.
    ///
    /// Composition failures (an unembeddable logo, a column count the table
    /// rejects) do not abort the render: the failure is logged, whatever was
    /// assembled up to that point is finalized, and the warning is carried in
    /// the result. Only document setup and final serialization are hard
    /// errors.
    pub fn render(
        &self,
        definition: &ReportDefinition,
        rows: &[StatementRow],
    ) -> Result<RenderedStatement, Error> {
        let mut document = self.new_document(definition)?;
        let warning = match self.compose(&mut document, definition, rows) {
            Ok(()) => None,
            Err(err) => {
                warn!("statement composition failed, keeping partial document: {err}");
                Some(err.to_string())
            }
        };
        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(RenderedStatement { bytes, warning })
    }

    fn new_document(&self, definition: &ReportDefinition) -> Result<Document, Error> {
        let font_family = crate::fonts::statement_font_family()?;
        let mut document = Document::new(font_family);
        document.set_paper_size(PaperSize::A4);
        if let Some(title) = &definition.title {
            document.set_title(title.clone());
        }

        let mut decorator = StatementPageDecorator::new(Margins::trbl(10, 10, 10, 10));
        if !footer_suppressed(definition) {
            decorator =
                decorator.with_footer(printed_date_line(), self.style.footer_text().to_style());
        }
        document.set_page_decorator(decorator);
        Ok(document)
    }

    fn compose(
        &self,
        document: &mut Document,
        definition: &ReportDefinition,
        rows: &[StatementRow],
    ) -> Result<(), Error> {
        document.push(self.header_band(definition)?);

        if let Some(entries) = definition.meta.as_deref() {
            document.push(self.meta_band(entries)?);
            document.push(Break::new(1));
        }

        if !definition.header.is_empty() {
            let table = self.data_table(&definition.header, rows)?;
            document.push(Break::new(1.5));
            document.push(table);
        }
        Ok(())
    }

    /// Borderless logo / institution / title band.
    fn header_band(&self, definition: &ReportDefinition) -> Result<TableLayout, Error> {
        let mut band = TableLayout::new(HEADER_BAND_WEIGHTS.to_vec());
        let mut row = band.row();
        row.push_element(logo::logo_element(definition.icon.as_deref())?);
        row.push_element(
            Paragraph::new(self.style.institution())
                .styled(self.style.institution_text().to_style()),
        );
        row.push_element(
            Paragraph::new(definition.title.clone().unwrap_or_default())
                .styled(self.style.title_text().to_style()),
        );
        row.push()?;
        Ok(band)
    }

    /// Borderless metadata grid; labels carry a trailing colon.
    fn meta_band(&self, entries: &[MetaEntry]) -> Result<TableLayout, Error> {
        let text = self.style.meta_text().to_style();
        match self.style.meta_grid() {
            MetaGrid::FourColumn => {
                let mut grid = TableLayout::new(META_GRID_FOUR.to_vec());
                for pair in entries.chunks(2) {
                    let mut row = grid.row();
                    for entry in pair {
                        row.push_element(
                            Paragraph::new(format!("{}:", entry.title)).styled(text),
                        );
                        row.push_element(Paragraph::new(entry.value.clone()).styled(text));
                    }
                    // An odd final entry still fills its visual row.
                    if pair.len() == 1 {
                        row.push_element(Paragraph::default());
                        row.push_element(Paragraph::default());
                    }
                    row.push()?;
                }
                Ok(grid)
            }
            MetaGrid::TwoColumn => {
                let mut grid = TableLayout::new(META_GRID_TWO.to_vec());
                for entry in entries {
                    let mut row = grid.row();
                    row.push_element(Paragraph::new(format!("{}:", entry.title)).styled(text));
                    row.push_element(Paragraph::new(entry.value.clone()).styled(text));
                    row.push()?;
                }
                Ok(grid)
            }
        }
    }

    /// Bordered data table.
    ///
    /// Column widths always follow the eight canonical row fields; when the
    /// definition carries a different column count the header push fails and
    /// the caller drops the whole table from the output.
    fn data_table(
        &self,
        columns: &[ColumnSpec],
        rows: &[StatementRow],
    ) -> Result<TableLayout, Error> {
        let mut table = TableLayout::new(DATA_TABLE_WEIGHTS.to_vec());
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

        let header_text = self.style.table_header_text().to_style();
        let mut header_row = table.row();
        for column in columns {
            header_row.push_element(centered(&column.field_name, header_text));
        }
        header_row.push()?;

        let data_text = self.style.table_data_text().to_style();
        for row in rows {
            let mut table_row = table.row();
            for cell in row.cells() {
                table_row.push_element(centered(cell, data_text));
            }
            table_row.push()?;
        }
        Ok(table)
    }
}

fn centered(text: &str, style: Style) -> impl Element {
    let mut paragraph = Paragraph::new(text);
    paragraph.set_alignment(Alignment::Center);
    paragraph.styled(style)
}

/// Right-aligned footer content for today.
fn printed_date_line() -> String {
    format!(
        "{}: {}",
        PRINTED_DATE_LABEL,
        chrono::Local::now().format("%Y-%m-%d")
    )
}

/// The footer is dropped when the caller already ships a printed date in the
/// metadata band.
fn footer_suppressed(definition: &ReportDefinition) -> bool {
    definition.meta.as_deref().map_or(false, |entries| {
        entries.iter().any(|entry| entry.title == PRINTED_DATE_LABEL)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaEntry;

    #[test]
    fn printed_date_line_uses_iso_date() {
        let line = printed_date_line();
        let date = line.strip_prefix("Printed Date: ").unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }

    #[test]
    fn footer_suppressed_only_by_matching_meta_label() {
        let mut definition = ReportDefinition::default();
        assert!(!footer_suppressed(&definition));

        definition.meta = Some(vec![MetaEntry::new("Account Name", "J. Doe")]);
        assert!(!footer_suppressed(&definition));

        definition.meta = Some(vec![
            MetaEntry::new("Account Name", "J. Doe"),
            MetaEntry::new(PRINTED_DATE_LABEL, "2024-05-01"),
        ]);
        assert!(footer_suppressed(&definition));
    }
}
