//! PDF rendering for circulation reports

use chrono::{DateTime, Utc};
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};

use crate::{
    error::{AppError, AppResult},
    models::issue::IssueRecordDetails,
};

// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 15.0;

/// Lays text out top to bottom, starting a new page when the current one is full
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn text(&mut self, font: &str, size: f32, x: f32, text: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current.push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.current.push(Operation::new("Td", vec![x.into(), self.y.into()]));
        self.current.push(Operation::new("Tj", vec![Object::string_literal(latin1(text))]));
        self.current.push(Operation::new("ET", vec![]));
    }

    fn title(&mut self, title: &str) {
        // Helvetica-Bold averages a bit over half the font size per glyph
        let width = title.chars().count() as f32 * TITLE_SIZE * 0.55;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.y -= TITLE_SIZE;
        self.text("F2", TITLE_SIZE, x, title);
        self.y -= TITLE_SIZE + LEADING;
    }

    fn ensure_room(&mut self, lines: usize) {
        let needed = lines as f32 * LEADING;
        if self.y - needed < MARGIN && !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    /// A group of lines kept on the same page, followed by a blank line
    fn block(&mut self, lines: &[String]) {
        self.ensure_room(lines.len() + 1);
        for line in lines {
            self.y -= LEADING;
            self.text("F1", BODY_SIZE, MARGIN, line);
        }
        self.y -= LEADING;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Map to single-byte WinAnsi text, replacing what the base fonts cannot show
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// Render issue records as a PDF document, one block per record
pub fn render_issue_report(title: &str, records: &[IssueRecordDetails]) -> AppResult<Vec<u8>> {
    let mut layout = PageLayout::new();
    layout.title(title);

    if records.is_empty() {
        layout.block(&["No records.".to_string()]);
    }

    for record in records {
        layout.block(&[
            format!("Book: {}", record.book_title),
            format!("User: {}", record.user_name),
            format!("Issue Date: {}", format_date(record.issue_date)),
            format!("Due Date: {}", format_date(record.due_date)),
            format!(
                "Return Date: {}",
                record.return_date.map(format_date).unwrap_or_else(|| "-".to_string())
            ),
        ]);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout.finish() {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| AppError::Internal(format!("Failed to encode report page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| AppError::Internal(format!("Failed to write report: {}", e)))?;
    Ok(out)
}
