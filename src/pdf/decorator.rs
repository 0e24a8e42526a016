//! Page decoration for statement documents.

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Alignment, Context, Element, Margins, Mm, PageDecorator, Position};

/// Vertical space reserved for the printed-date line, in millimetres.
const FOOTER_RESERVE_MM: f64 = 10.0;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Applies the page margins and stamps the right-aligned printed-date line
/// into a reserved strip near the bottom of the first page. Later pages only
/// get the margins; the date appears once per statement.
pub(super) struct StatementPageDecorator {
    page: usize,
    margins: Margins,
    footer: Option<FooterLine>,
}

struct FooterLine {
    text: String,
    style: Style,
    height: Mm,
}

impl FooterLine {
    fn element(&self) -> impl Element {
        let mut paragraph = Paragraph::new(self.text.clone());
        paragraph.set_alignment(Alignment::Right);
        paragraph.styled(self.style)
    }
}

impl StatementPageDecorator {
    pub(super) fn new(margins: impl Into<Margins>) -> Self {
        Self {
            page: 0,
            margins: margins.into(),
            footer: None,
        }
    }

    /// Adds the printed-date line and returns the updated decorator.
    pub(super) fn with_footer(mut self, text: impl Into<String>, style: Style) -> Self {
        self.footer = Some(FooterLine {
            text: text.into(),
            style,
            height: mm_from_f64(FOOTER_RESERVE_MM),
        });
        self
    }
}

impl PageDecorator for StatementPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: Area<'a>,
        style: Style,
    ) -> Result<Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        let footer = match &self.footer {
            Some(footer) if self.page == 1 => footer,
            _ => return Ok(area),
        };

        let available = area.size().height;
        if footer.height > available {
            return Err(Error::new(
                "Footer strip exceeds the available page height",
                ErrorKind::InvalidData,
            ));
        }

        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, available - footer.height));
        let mut element = footer.element();
        let result = element.render(context, footer_area, style)?;
        if result.has_more {
            return Err(Error::new(
                "Footer line does not fit into the reserved strip",
                ErrorKind::PageSizeExceeded,
            ));
        }

        area.set_height(available - footer.height);
        Ok(area)
    }
}
