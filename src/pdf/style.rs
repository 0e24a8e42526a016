//! Style configuration for statement rendering.
//!
//! The original layout hardcoded font choices at every call site; here they
//! are collected into one immutable [`StatementStyle`] value handed to the
//! renderer, with one [`TextStyle`] per text role. Conversion to
//! [`genpdf::style::Style`] happens at the element layer.

use genpdf::style::Style;

/// Font size and weight for a single text role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    size: u8,
    bold: bool,
}

impl TextStyle {
    /// Creates a regular-weight style at the given point size.
    pub const fn regular(size: u8) -> Self {
        Self { size, bold: false }
    }

    /// Creates a bold style at the given point size.
    pub const fn bold(size: u8) -> Self {
        Self { size, bold: true }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Builds the `genpdf` style for this role.
    pub fn to_style(&self) -> Style {
        let mut style = Style::new().with_font_size(self.size);
        if self.bold {
            style.set_bold();
        }
        style
    }
}

/// Arrangement of the metadata band above the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetaGrid {
    /// Two label/value pairs per visual row; an odd final entry is padded
    /// with a blank pair.
    #[default]
    FourColumn,
    /// One label/value pair per row.
    TwoColumn,
}

/// Immutable presentation settings for one statement rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementStyle {
    institution: String,
    institution_text: TextStyle,
    title_text: TextStyle,
    meta_text: TextStyle,
    table_header_text: TextStyle,
    table_data_text: TextStyle,
    footer_text: TextStyle,
    meta_grid: MetaGrid,
}

impl Default for StatementStyle {
    fn default() -> Self {
        Self {
            institution: "KHAAN BANK".to_owned(),
            institution_text: TextStyle::bold(14),
            title_text: TextStyle::bold(16),
            meta_text: TextStyle::regular(10),
            table_header_text: TextStyle::bold(10),
            table_data_text: TextStyle::regular(10),
            footer_text: TextStyle::regular(10),
            meta_grid: MetaGrid::FourColumn,
        }
    }
}

impl StatementStyle {
    /// Creates the default statement style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Institution name shown next to the logo.
    pub fn institution(&self) -> &str {
        &self.institution
    }

    pub fn institution_text(&self) -> TextStyle {
        self.institution_text
    }

    pub fn title_text(&self) -> TextStyle {
        self.title_text
    }

    pub fn meta_text(&self) -> TextStyle {
        self.meta_text
    }

    pub fn table_header_text(&self) -> TextStyle {
        self.table_header_text
    }

    pub fn table_data_text(&self) -> TextStyle {
        self.table_data_text
    }

    pub fn footer_text(&self) -> TextStyle {
        self.footer_text
    }

    pub fn meta_grid(&self) -> MetaGrid {
        self.meta_grid
    }

    /// Sets the institution name and returns the updated style.
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    /// Sets the metadata band arrangement and returns the updated style.
    pub fn with_meta_grid(mut self, grid: MetaGrid) -> Self {
        self.meta_grid = grid;
        self
    }

    /// Sets the institution-name text style and returns the updated style.
    pub fn with_institution_text(mut self, text: TextStyle) -> Self {
        self.institution_text = text;
        self
    }

    /// Sets the report-title text style and returns the updated style.
    pub fn with_title_text(mut self, text: TextStyle) -> Self {
        self.title_text = text;
        self
    }

    /// Sets the metadata text style and returns the updated style.
    pub fn with_meta_text(mut self, text: TextStyle) -> Self {
        self.meta_text = text;
        self
    }

    /// Sets the table-header text style and returns the updated style.
    pub fn with_table_header_text(mut self, text: TextStyle) -> Self {
        self.table_header_text = text;
        self
    }

    /// Sets the table-data text style and returns the updated style.
    pub fn with_table_data_text(mut self, text: TextStyle) -> Self {
        self.table_data_text = text;
        self
    }

    /// Sets the footer text style and returns the updated style.
    pub fn with_footer_text(mut self, text: TextStyle) -> Self {
        self.footer_text = text;
        self
    }
}
