//! Writes laid-out pages as a PDF using printpdf's built-in Helvetica faces.
//!
//! CPU-bound: call from `tokio::task::spawn_blocking`.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt,
    Rgb, TextItem,
};
use tracing::warn;

use crate::layout::{FontFamily, Frame, Item, Page, PageConfig, Rule, TextRun};

fn builtin(font: FontFamily) -> BuiltinFont {
    match font {
        FontFamily::Helvetica => BuiltinFont::Helvetica,
        FontFamily::HelveticaBold => BuiltinFont::HelveticaBold,
    }
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb {
        r: level,
        g: level,
        b: level,
        icc_profile: None,
    })
}

fn text_ops(run: &TextRun, config: &PageConfig, ops: &mut Vec<Op>) {
    let font = builtin(run.font);
    // PDF y grows upwards from the bottom edge.
    let baseline = config.page_height_mm - (run.top_mm + run.baseline_offset_mm());
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point::new(Mm(run.x_mm), Mm(baseline)),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(run.size_pt),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(run.text.clone())],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn rule_ops(rule: &Rule, config: &PageConfig, ops: &mut Vec<Op>) {
    let y = config.page_height_mm - rule.y_mm;
    ops.push(Op::SetOutlineColor {
        col: gray(rule.gray),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(rule.thickness_pt),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                LinePoint {
                    p: Point::new(Mm(rule.x1_mm), Mm(y)),
                    bezier: false,
                },
                LinePoint {
                    p: Point::new(Mm(rule.x2_mm), Mm(y)),
                    bezier: false,
                },
            ],
            is_closed: false,
        },
    });
}

fn frame_ops(frame: &Frame, config: &PageConfig, ops: &mut Vec<Op>) {
    let top = config.page_height_mm - frame.top_mm;
    let bottom = top - frame.height_mm;
    let left = frame.x_mm;
    let right = frame.x_mm + frame.width_mm;
    ops.push(Op::SetOutlineColor { col: gray(0.0) });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(frame.thickness_pt),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: [(left, top), (right, top), (right, bottom), (left, bottom)]
                .into_iter()
                .map(|(x, y)| LinePoint {
                    p: Point::new(Mm(x), Mm(y)),
                    bezier: false,
                })
                .collect(),
            is_closed: true,
        },
    });
}

fn page_ops(page: &Page, config: &PageConfig) -> Vec<Op> {
    let mut ops = Vec::with_capacity(page.items.len() * 5);
    for item in &page.items {
        match item {
            Item::Text(run) => text_ops(run, config, &mut ops),
            Item::Rule(rule) => rule_ops(rule, config, &mut ops),
            Item::Frame(frame) => frame_ops(frame, config, &mut ops),
        }
    }
    ops
}

/// Renders every page into one PDF document and returns its bytes.
pub fn render_pdf(pages: &[Page], config: &PageConfig, title: &str) -> Vec<u8> {
    let pdf_pages: Vec<PdfPage> = pages
        .iter()
        .map(|page| {
            PdfPage::new(
                Mm(config.page_width_mm),
                Mm(config.page_height_mm),
                page_ops(page, config),
            )
        })
        .collect();

    let mut warnings = Vec::new();
    let bytes = PdfDocument::new(title)
        .with_pages(pdf_pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "PDF writer reported warnings");
    }
    bytes
}
