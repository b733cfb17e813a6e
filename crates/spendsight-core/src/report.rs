//! Reporter - portable PDF summary of a spending analysis
//!
//! Building a report happens in two steps:
//! 1. [`ReportDocument::layout`] places every line of text, table cell and
//!    rule on US Letter pages, starting a new page when content overflows.
//! 2. [`render_pdf`] encodes the laid-out pages with `pdf-writer`.
//!
//! Text uses the standard Helvetica fonts, so only printable ASCII is
//! emitted; see [`sanitize_text`].

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::models::{format_amount, CategoryTotals};

pub const REPORT_FILENAME: &str = "Finance_Report.pdf";
pub const REPORT_MIME_TYPE: &str = "application/pdf";
pub const DEFAULT_REPORT_TITLE: &str = "Financial Analysis Report";

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 15.0;
const ROW_HEIGHT: f32 = 20.0;
const AMOUNT_COLUMN_X: f32 = MARGIN + CONTENT_WIDTH * 0.6;
const BULLET_INDENT: f32 = 12.0;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One positioned drawing operation. Coordinates are PDF points with the
/// origin at the bottom-left of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        text: String,
    },
    /// Gray filled rectangle (table header background)
    Shade { x: f32, y: f32, width: f32, height: f32 },
    /// Horizontal rule
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<LayoutItem>,
}

impl PageLayout {
    /// All text on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Report content, independent of how it is encoded
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub user: String,
    pub total_spend: f64,
    /// (category, amount) rows in table order
    pub rows: Vec<(String, f64)>,
    pub suggestions: Vec<String>,
    pub currency_symbol: String,
}

impl ReportDocument {
    pub fn new(
        user: &str,
        total_spend: f64,
        category_totals: &CategoryTotals,
        suggestions: &[String],
    ) -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            user: user.to_string(),
            total_spend,
            rows: category_totals
                .iter()
                .map(|(category, amount)| (category.clone(), *amount))
                .collect(),
            suggestions: suggestions.to_vec(),
            currency_symbol: "₹".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{}", self.currency_symbol, format_amount(amount))
    }

    /// Place the document on pages
    pub fn layout(&self) -> Vec<PageLayout> {
        let mut cursor = Cursor::new();

        cursor.title(&self.title);
        cursor.advance(LINE_HEIGHT);

        cursor.paragraph(&format!("User: {}", self.user), MARGIN, CONTENT_WIDTH);
        cursor.paragraph(
            &format!("Total Spending: {}", self.money(self.total_spend)),
            MARGIN,
            CONTENT_WIDTH,
        );
        cursor.advance(LINE_HEIGHT);

        // Category table
        cursor.heading("Category Breakdown");
        cursor.reserve(ROW_HEIGHT * 2.0);
        cursor.table_header();
        for (category, amount) in &self.rows {
            if !cursor.fits(ROW_HEIGHT) {
                cursor.new_page();
                cursor.table_header();
            }
            cursor.table_row(category, &self.money(*amount));
        }
        cursor.advance(LINE_HEIGHT);

        cursor.heading("Suggestions");
        for suggestion in &self.suggestions {
            cursor.bullet(suggestion);
        }

        cursor.finish()
    }
}

/// Vertical flow state while laying out pages
struct Cursor {
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Baseline of the next line
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![],
            current: PageLayout::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= MARGIN
    }

    fn reserve(&mut self, height: f32) {
        if !self.fits(height) {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    fn text(&mut self, x: f32, size: f32, weight: FontWeight, text: &str) {
        self.current.items.push(LayoutItem::Text {
            x,
            y: self.y,
            size,
            weight,
            text: sanitize_text(text),
        });
    }

    fn title(&mut self, text: &str) {
        for line in wrap_text(&sanitize_text(text), max_chars(CONTENT_WIDTH, TITLE_SIZE)) {
            self.reserve(TITLE_SIZE + LINE_HEIGHT);
            self.advance(TITLE_SIZE + 4.0);
            self.text(MARGIN, TITLE_SIZE, FontWeight::Bold, &line);
        }
    }

    fn heading(&mut self, text: &str) {
        // Keep a heading together with at least one line of what follows
        self.reserve(HEADING_SIZE + LINE_HEIGHT * 2.0);
        self.advance(HEADING_SIZE);
        self.text(MARGIN, HEADING_SIZE, FontWeight::Bold, text);
        self.advance(LINE_HEIGHT * 0.5);
    }

    fn paragraph(&mut self, text: &str, x: f32, width: f32) {
        for line in wrap_text(&sanitize_text(text), max_chars(width, BODY_SIZE)) {
            self.reserve(LINE_HEIGHT);
            self.advance(LINE_HEIGHT);
            self.text(x, BODY_SIZE, FontWeight::Regular, &line);
        }
    }

    fn bullet(&mut self, text: &str) {
        let width = CONTENT_WIDTH - BULLET_INDENT;
        for (i, line) in wrap_text(&sanitize_text(text), max_chars(width, BODY_SIZE))
            .into_iter()
            .enumerate()
        {
            self.reserve(LINE_HEIGHT);
            self.advance(LINE_HEIGHT);
            if i == 0 {
                self.text(MARGIN, BODY_SIZE, FontWeight::Regular, "-");
            }
            self.text(MARGIN + BULLET_INDENT, BODY_SIZE, FontWeight::Regular, &line);
        }
    }

    fn table_header(&mut self) {
        self.current.items.push(LayoutItem::Shade {
            x: MARGIN,
            y: self.y - ROW_HEIGHT,
            width: CONTENT_WIDTH,
            height: ROW_HEIGHT,
        });
        self.advance(ROW_HEIGHT);
        let baseline = self.y;
        self.y = baseline + 6.0;
        self.text(MARGIN + 6.0, BODY_SIZE, FontWeight::Bold, "Category");
        self.text(AMOUNT_COLUMN_X, BODY_SIZE, FontWeight::Bold, "Amount");
        self.y = baseline;
    }

    fn table_row(&mut self, category: &str, amount: &str) {
        self.advance(ROW_HEIGHT);
        let baseline = self.y;
        self.y = baseline + 6.0;
        let category = truncate(
            &sanitize_text(category),
            max_chars(AMOUNT_COLUMN_X - MARGIN - 12.0, BODY_SIZE),
        );
        self.text(MARGIN + 6.0, BODY_SIZE, FontWeight::Regular, &category);
        self.text(AMOUNT_COLUMN_X, BODY_SIZE, FontWeight::Regular, amount);
        self.y = baseline;
        self.current.items.push(LayoutItem::Rule {
            x1: MARGIN,
            x2: MARGIN + CONTENT_WIDTH,
            y: baseline,
        });
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn max_chars(width: f32, size: f32) -> usize {
    ((width / (size * AVG_GLYPH_WIDTH)) as usize).max(1)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Greedy word wrap; words longer than a line are split
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        if line.is_empty() {
            line = word;
        } else if line.chars().count() + 1 + word.chars().count() <= max_chars {
            line.push(' ');
            line.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut line, word));
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Reduce text to printable ASCII. Currency symbols are spelled out,
/// typographic punctuation is flattened and anything else becomes `?`.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            '₹' => out.push_str("Rs."),
            '€' => out.push_str("EUR "),
            '£' => out.push_str("GBP "),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2022}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            c if c.is_control() => {}
            _ => out.push('?'),
        }
    }
    out
}

/// Encode laid-out pages as a PDF document
pub fn render_pdf(title: &str, pages: &[PageLayout]) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let tree_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let info_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);
    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));
    pdf.document_info(info_id)
        .title(TextStr(&sanitize_text(title)))
        .producer(TextStr("spendsight"));

    for (layout, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(tree_id);
        page.contents(*content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(FONT_REGULAR, regular_id);
        fonts.pair(FONT_BOLD, bold_id);
        fonts.finish();
        resources.finish();
        page.finish();

        pdf.stream(*content_id, &encode_page(layout));
    }

    let bytes = pdf.finish();
    debug!(pages = pages.len(), bytes = bytes.len(), "Rendered PDF report");
    bytes
}

fn encode_page(layout: &PageLayout) -> Vec<u8> {
    let mut content = Content::new();

    for item in &layout.items {
        match item {
            LayoutItem::Text {
                x,
                y,
                size,
                weight,
                text,
            } => {
                let font = match weight {
                    FontWeight::Regular => FONT_REGULAR,
                    FontWeight::Bold => FONT_BOLD,
                };
                content.begin_text();
                content.set_font(font, *size);
                content.next_line(*x, *y);
                content.show(Str(text.as_bytes()));
                content.end_text();
            }
            LayoutItem::Shade {
                x,
                y,
                width,
                height,
            } => {
                content.save_state();
                content.set_fill_gray(0.85);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            LayoutItem::Rule { x1, x2, y } => {
                content.save_state();
                content.set_line_width(0.5);
                content.set_stroke_gray(0.6);
                content.move_to(*x1, *y);
                content.line_to(*x2, *y);
                content.stroke();
                content.restore_state();
            }
        }
    }

    content.finish()
}

/// Render the standard report
pub fn build_report(
    user: &str,
    total_spend: f64,
    category_totals: &CategoryTotals,
    suggestions: &[String],
) -> Vec<u8> {
    build_document(&ReportDocument::new(
        user,
        total_spend,
        category_totals,
        suggestions,
    ))
}

/// Render an already-assembled document
pub fn build_document(document: &ReportDocument) -> Vec<u8> {
    render_pdf(&document.title, &document.layout())
}
