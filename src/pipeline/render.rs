//! PDF rendering: lay the report document out as a single Letter page.
//!
//! The document is assembled directly as PDF 1.4 objects — five objects,
//! one uncompressed content stream, Helvetica 12 pt. Writing the bytes
//! ourselves keeps the output fully deterministic: no producer string, no
//! creation timestamp, no document ID, so structurally identical reports
//! are byte-identical. That determinism is part of the layout contract and
//! is asserted in tests.
//!
//! ## Layout
//!
//! Fixed single-column text at x = 100, coordinate origin bottom-left,
//! Letter page (612 × 792 pt):
//!
//! ```text
//! 752  Car Details:
//! 732  License Plate: <plate>
//! 712  Model: <model>          (20 pt per line)
//! 692  Color: <color>
//! 672  VIN Number: <vin>
//! 652  Brand: <brand>
//! 612  Damages:
//! 592  Damage Type: <type>     ┐ one entry per damage record,
//! 572  Damaged Part: <part>    │ cursor advances 60 pt per entry,
//! 552  Date: <date>            ┘ store order
//! ```
//!
//! A report with no damages shows the "Damages:" header and nothing below
//! it. A long history simply runs off the bottom edge; entries keep their
//! coordinates rather than flowing to a second page.

use crate::error::ReportError;
use crate::output::ReportDocument;

const PAGE_WIDTH: i32 = 612;
const PAGE_HEIGHT: i32 = 792;
const MARGIN_X: i32 = 100;
const LINE_STEP: i32 = 20;
const FONT_SIZE: i32 = 12;

/// Render the report document as a complete, self-contained PDF.
pub fn render(doc: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let content = content_stream(doc);
    Ok(write_pdf(&content))
}

/// The text lines of the report, top to bottom, with their baselines.
fn layout_lines(doc: &ReportDocument) -> Vec<(i32, String)> {
    let car = &doc.car;
    let mut lines = vec![
        (PAGE_HEIGHT - 40, "Car Details:".to_string()),
        (PAGE_HEIGHT - 60, format!("License Plate: {}", car.license_plate)),
        (PAGE_HEIGHT - 80, format!("Model: {}", car.model)),
        (PAGE_HEIGHT - 100, format!("Color: {}", car.color)),
        (PAGE_HEIGHT - 120, format!("VIN Number: {}", car.vin_number)),
        (PAGE_HEIGHT - 140, format!("Brand: {}", car.brand)),
        (PAGE_HEIGHT - 180, "Damages:".to_string()),
    ];

    let mut y = PAGE_HEIGHT - 200;
    for damage in &doc.damages {
        lines.push((y, format!("Damage Type: {}", damage.damage_type)));
        lines.push((y - LINE_STEP, format!("Damaged Part: {}", damage.damaged_part)));
        lines.push((y - 2 * LINE_STEP, format!("Date: {}", damage.date)));
        y -= 3 * LINE_STEP;
    }

    lines
}

/// Build the page content stream: one `Tj` text-show operation per line.
fn content_stream(doc: &ReportDocument) -> Vec<u8> {
    let mut s = String::new();
    for (y, text) in layout_lines(doc) {
        s.push_str(&format!(
            "BT /F1 {FONT_SIZE} Tf {MARGIN_X} {y} Td ({}) Tj ET\n",
            escape_pdf_string(&text)
        ));
    }
    s.into_bytes()
}

/// Escape a string for inclusion in a PDF literal string `(...)`.
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\\"),
            '(' => out.push_str(r"\("),
            ')' => out.push_str(r"\)"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Assemble the full PDF file around the content stream.
///
/// Object layout is fixed: 1 catalog, 2 page tree, 3 page, 4 contents,
/// 5 font. Offsets in the xref table are byte-exact, so the file is valid
/// for strict readers, not just lenient ones.
fn write_pdf(content: &[u8]) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::with_capacity(content.len() + 1024);
    let mut offsets: Vec<usize> = Vec::with_capacity(5);

    buf.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(buf.len());
    buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(buf.len());
    buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(buf.len());
    buf.extend_from_slice(
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>\nendobj\n"
        )
        .as_bytes(),
    );

    offsets.push(buf.len());
    buf.extend_from_slice(format!("4 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes());
    buf.extend_from_slice(content);
    buf.extend_from_slice(b"endstream\nendobj\n");

    offsets.push(buf.len());
    buf.extend_from_slice(
        b"5 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n",
    );

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    buf
}
