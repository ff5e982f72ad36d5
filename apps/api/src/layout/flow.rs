//! Column flow and pagination.
//!
//! Content is laid out top-down on one continuous column as tall as the whole
//! document. Vertical positions are measured from the top of the first page, so
//! page `k` covers `[k * page_height, (k + 1) * page_height)`. The builder keeps
//! every line inside a page's margins: a line that would cross into the bottom
//! margin starts at the top margin of the next page instead. Pagination is then
//! a pure slice of the column by page index.

use serde::Serialize;

use crate::layout::font_metrics::{metrics_for, FontFamily, PageConfig, PT_TO_MM};

const EPSILON_MM: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub font: FontFamily,
    pub size_pt: f32,
    pub x_mm: f32,
    /// Top of the line box.
    pub top_mm: f32,
    pub height_mm: f32,
}

impl TextRun {
    /// Baseline offset from the top of the line box.
    pub fn baseline_offset_mm(&self) -> f32 {
        let leading = self.height_mm - self.size_pt * PT_TO_MM;
        leading / 2.0 + self.size_pt * PT_TO_MM * 0.8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub x1_mm: f32,
    pub x2_mm: f32,
    pub y_mm: f32,
    pub thickness_pt: f32,
    /// 0.0 = black, 1.0 = white.
    pub gray: f32,
}

/// Rectangle outline, e.g. the placeholder where a photo would go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub x_mm: f32,
    pub top_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub thickness_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    Text(TextRun),
    Rule(Rule),
    Frame(Frame),
}

impl Item {
    pub fn top_mm(&self) -> f32 {
        match self {
            Item::Text(run) => run.top_mm,
            Item::Rule(rule) => rule.y_mm,
            Item::Frame(frame) => frame.top_mm,
        }
    }

    pub fn bottom_mm(&self) -> f32 {
        match self {
            Item::Text(run) => run.top_mm + run.height_mm,
            Item::Rule(rule) => rule.y_mm,
            Item::Frame(frame) => frame.top_mm + frame.height_mm,
        }
    }

    fn shifted(&self, dy: f32) -> Item {
        match self {
            Item::Text(run) => Item::Text(TextRun {
                top_mm: run.top_mm - dy,
                ..run.clone()
            }),
            Item::Rule(rule) => Item::Rule(Rule {
                y_mm: rule.y_mm - dy,
                ..rule.clone()
            }),
            Item::Frame(frame) => Item::Frame(Frame {
                top_mm: frame.top_mm - dy,
                ..frame.clone()
            }),
        }
    }
}

/// The whole document on one continuous column.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub items: Vec<Item>,
    pub height_mm: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Zero-based.
    pub index: usize,
    /// Positions are relative to the top of this page.
    pub items: Vec<Item>,
}

/// Text style for one block.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub font: FontFamily,
    pub size_pt: f32,
}

impl Style {
    pub const fn new(font: FontFamily, size_pt: f32) -> Self {
        Style { font, size_pt }
    }
}

pub struct ColumnBuilder<'a> {
    config: &'a PageConfig,
    cursor_mm: f32,
    items: Vec<Item>,
}

impl<'a> ColumnBuilder<'a> {
    pub fn new(config: &'a PageConfig) -> Self {
        ColumnBuilder {
            config,
            cursor_mm: config.margin_mm,
            items: Vec::new(),
        }
    }

    fn page_of(&self, y_mm: f32) -> usize {
        (y_mm / self.config.page_height_mm).floor().max(0.0) as usize
    }

    fn page_top_margin(&self, page: usize) -> f32 {
        page as f32 * self.config.page_height_mm + self.config.margin_mm
    }

    fn page_bottom_limit(&self, page: usize) -> f32 {
        (page + 1) as f32 * self.config.page_height_mm - self.config.margin_mm
    }

    /// Moves to the next page when `height_mm` does not fit above the bottom margin.
    ///
    /// Also normalizes a cursor that a gap pushed into a bottom margin or past a
    /// page edge, so the next block always starts inside a page's text area.
    fn ensure_room(&mut self, height_mm: f32) {
        let page = self.page_of(self.cursor_mm);
        let top = self.page_top_margin(page);
        if self.cursor_mm < top {
            self.cursor_mm = top;
            return;
        }
        let at_page_top = self.cursor_mm <= top + EPSILON_MM;
        if !at_page_top && self.cursor_mm + height_mm > self.page_bottom_limit(page) + EPSILON_MM {
            self.cursor_mm = self.page_top_margin(page + 1);
        }
    }

    /// Wraps `text` to the text width minus `indent_mm` and places each line.
    pub fn paragraph(&mut self, text: &str, style: Style, indent_mm: f32) {
        let width = self.config.text_width_mm() - indent_mm;
        let lines = metrics_for(style.font).wrap(text, style.size_pt, width);
        for line in lines {
            self.line(line, style, self.config.margin_mm + indent_mm);
        }
    }

    /// A bullet marker hanging to the left of a wrapped paragraph.
    pub fn bullet(&mut self, marker: &str, text: &str, style: Style, indent_mm: f32) {
        let metrics = metrics_for(style.font);
        let hang = metrics.width_mm(marker, style.size_pt) + metrics.width_mm(" ", style.size_pt);
        let width = self.config.text_width_mm() - indent_mm - hang;
        let lines = metrics.wrap(text, style.size_pt, width);
        let text_x = self.config.margin_mm + indent_mm + hang;

        for (i, line) in lines.into_iter().enumerate() {
            let height = self.config.line_height_mm(style.size_pt);
            self.ensure_room(height);
            if i == 0 {
                self.items.push(Item::Text(TextRun {
                    text: marker.to_string(),
                    font: style.font,
                    size_pt: style.size_pt,
                    x_mm: self.config.margin_mm + indent_mm,
                    top_mm: self.cursor_mm,
                    height_mm: height,
                }));
            }
            self.push_line(line, style, text_x, height);
        }
    }

    /// Left text wraps beside a right-aligned label that sits on its first line.
    pub fn split_line(&mut self, left: &str, left_style: Style, right: &str, right_style: Style) {
        let right_metrics = metrics_for(right_style.font);
        let right_w = right_metrics.width_mm(right, right_style.size_pt);
        let gutter = if right.is_empty() { 0.0 } else { 4.0 };
        let left_width = (self.config.text_width_mm() - right_w - gutter).max(20.0);
        let lines = metrics_for(left_style.font).wrap(left, left_style.size_pt, left_width);

        let height = self
            .config
            .line_height_mm(left_style.size_pt.max(right_style.size_pt));
        self.ensure_room(height);
        if !right.is_empty() {
            self.items.push(Item::Text(TextRun {
                text: right.to_string(),
                font: right_style.font,
                size_pt: right_style.size_pt,
                x_mm: self.config.right_edge_mm() - right_w,
                top_mm: self.cursor_mm,
                height_mm: height,
            }));
        }

        let mut lines = lines.into_iter();
        match lines.next() {
            Some(first) => self.push_line(first, left_style, self.config.margin_mm, height),
            None => self.cursor_mm += height,
        }
        for line in lines {
            self.line(line, left_style, self.config.margin_mm);
        }
    }

    fn line(&mut self, text: String, style: Style, x_mm: f32) {
        let height = self.config.line_height_mm(style.size_pt);
        self.ensure_room(height);
        self.push_line(text, style, x_mm, height);
    }

    fn push_line(&mut self, text: String, style: Style, x_mm: f32, height_mm: f32) {
        self.items.push(Item::Text(TextRun {
            text,
            font: style.font,
            size_pt: style.size_pt,
            x_mm,
            top_mm: self.cursor_mm,
            height_mm,
        }));
        self.cursor_mm += height_mm;
    }

    /// Horizontal rule across the text width, followed by `space_after_mm`.
    pub fn rule(&mut self, thickness_pt: f32, gray: f32, space_after_mm: f32) {
        self.ensure_room(space_after_mm);
        self.items.push(Item::Rule(Rule {
            x1_mm: self.config.margin_mm,
            x2_mm: self.config.right_edge_mm(),
            y_mm: self.cursor_mm,
            thickness_pt,
            gray,
        }));
        self.cursor_mm += space_after_mm;
    }

    /// Square frame at the left margin with `label` centred inside.
    ///
    /// The cursor does not move, so following lines can sit beside the frame
    /// when indented. Returns the frame's bottom for [`Self::clear_to`].
    pub fn frame(&mut self, label: &str, style: Style, size_mm: f32) -> f32 {
        self.ensure_room(size_mm);
        let x_mm = self.config.margin_mm;
        let top_mm = self.cursor_mm;
        self.items.push(Item::Frame(Frame {
            x_mm,
            top_mm,
            width_mm: size_mm,
            height_mm: size_mm,
            thickness_pt: 0.75,
        }));

        let label_w = metrics_for(style.font).width_mm(label, style.size_pt);
        let height = self.config.line_height_mm(style.size_pt);
        self.items.push(Item::Text(TextRun {
            text: label.to_string(),
            font: style.font,
            size_pt: style.size_pt,
            x_mm: x_mm + (size_mm - label_w) / 2.0,
            top_mm: top_mm + (size_mm - height) / 2.0,
            height_mm: height,
        }));
        top_mm + size_mm
    }

    /// Moves the cursor down to `y_mm` if it is above it.
    pub fn clear_to(&mut self, y_mm: f32) {
        self.cursor_mm = self.cursor_mm.max(y_mm);
    }

    pub fn gap(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }

    /// Starts a new block on the next page unless `height_mm` still fits here.
    pub fn keep_together(&mut self, height_mm: f32) {
        self.ensure_room(height_mm);
    }

    pub fn finish(self) -> Column {
        let height_mm = self
            .items
            .iter()
            .map(Item::bottom_mm)
            .fold(0.0_f32, f32::max);
        Column {
            items: self.items,
            height_mm,
        }
    }
}

/// Number of pages a column of `height_mm` occupies. Never zero.
pub fn page_count(height_mm: f32, page_height_mm: f32) -> usize {
    if height_mm <= 0.0 {
        return 1;
    }
    ((height_mm / page_height_mm).ceil() as usize).max(1)
}

/// Slices a column into pages. Items are assigned by the page their top lies on
/// and shifted up by that page's offset.
pub fn paginate(column: &Column, config: &PageConfig) -> Vec<Page> {
    let count = page_count(column.height_mm, config.page_height_mm);
    let mut pages: Vec<Page> = (0..count)
        .map(|index| Page {
            index,
            items: Vec::new(),
        })
        .collect();

    for item in &column.items {
        let index = ((item.top_mm() / config.page_height_mm).floor().max(0.0) as usize)
            .min(count - 1);
        let offset = index as f32 * config.page_height_mm;
        pages[index].items.push(item.shifted(offset));
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::a4_page_config;

    const BODY: Style = Style::new(FontFamily::Helvetica, 10.0);
    const TITLE: Style = Style::new(FontFamily::HelveticaBold, 12.0);

    fn text_runs(items: &[Item]) -> Vec<&TextRun> {
        items
            .iter()
            .filter_map(|i| match i {
                Item::Text(run) => Some(run),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0.0, 297.0), 1);
        assert_eq!(page_count(120.0, 297.0), 1);
        assert_eq!(page_count(297.0, 297.0), 1);
        assert_eq!(page_count(297.5, 297.0), 2);
        assert_eq!(page_count(600.0, 297.0), 3);
    }

    #[test]
    fn test_empty_column_has_one_page() {
        let config = a4_page_config();
        let column = ColumnBuilder::new(&config).finish();
        let pages = paginate(&column, &config);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.is_empty());
    }

    #[test]
    fn test_first_line_starts_at_top_margin() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        builder.paragraph("Hello", BODY, 0.0);
        let column = builder.finish();
        let runs = text_runs(&column.items);
        assert_eq!(runs.len(), 1);
        assert!((runs[0].top_mm - 15.0).abs() < 1e-4);
        assert!((runs[0].x_mm - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_document_spans_pages_without_straddling() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        for i in 0..200 {
            builder.paragraph(&format!("Line number {i}"), BODY, 0.0);
        }
        let column = builder.finish();
        let pages = paginate(&column, &config);
        assert!(pages.len() >= 2);

        let total: usize = pages.iter().map(|p| p.items.len()).sum();
        assert_eq!(total, 200);

        for page in &pages {
            for item in &page.items {
                assert!(item.top_mm() >= config.margin_mm - 1e-3);
                assert!(item.bottom_mm() <= config.page_height_mm - config.margin_mm + 0.02);
            }
        }

        // Order is preserved across the page break.
        let first_on_second = text_runs(&pages[1].items)[0].text.clone();
        let last_on_first = text_runs(&pages[0].items).last().unwrap().text.clone();
        let n_first: usize = last_on_first.trim_start_matches("Line number ").parse().unwrap();
        let n_second: usize = first_on_second.trim_start_matches("Line number ").parse().unwrap();
        assert_eq!(n_second, n_first + 1);
    }

    #[test]
    fn test_split_line_right_aligns_label() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        builder.split_line("Senior Engineer", TITLE, "2021 - Present", BODY);
        let column = builder.finish();
        let runs = text_runs(&column.items);
        assert_eq!(runs.len(), 2);
        let label = runs.iter().find(|r| r.text == "2021 - Present").unwrap();
        let right_edge =
            label.x_mm + metrics_for(BODY.font).width_mm(&label.text, BODY.size_pt);
        assert!((right_edge - config.right_edge_mm()).abs() < 1e-3);
        let title = runs.iter().find(|r| r.text == "Senior Engineer").unwrap();
        assert_eq!(title.top_mm, label.top_mm);
    }

    #[test]
    fn test_bullet_hangs_continuation_lines() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        let long = "word ".repeat(80);
        builder.bullet("-", &long, BODY, 3.0);
        let column = builder.finish();
        let runs = text_runs(&column.items);
        assert_eq!(runs[0].text, "-");
        let text_x = runs[1].x_mm;
        assert!(text_x > runs[0].x_mm);
        assert!(runs[2..].iter().all(|r| (r.x_mm - text_x).abs() < 1e-4));
    }

    #[test]
    fn test_gap_into_bottom_margin_moves_next_line() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        builder.gap(config.page_height_mm - 2.0 * config.margin_mm);
        builder.paragraph("After the gap", BODY, 0.0);
        let column = builder.finish();
        let pages = paginate(&column, &config);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].items.is_empty());
        assert!((pages[1].items[0].top_mm() - config.margin_mm).abs() < 1e-3);
    }

    #[test]
    fn test_rule_is_recorded() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        builder.paragraph("Header", TITLE, 0.0);
        builder.rule(1.0, 0.0, 2.0);
        let column = builder.finish();
        let before = column.items[0].bottom_mm();
        match column.items.last().unwrap() {
            Item::Rule(rule) => {
                assert!((rule.y_mm - before).abs() < 1e-4);
                assert!((rule.x2_mm - rule.x1_mm - config.text_width_mm()).abs() < 1e-4);
            }
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_centres_label_and_keeps_cursor() {
        let config = a4_page_config();
        let mut builder = ColumnBuilder::new(&config);
        let bottom = builder.frame("A", TITLE, 20.0);
        assert!((bottom - (config.margin_mm + 20.0)).abs() < 1e-4);

        builder.paragraph("Beside", BODY, 25.0);
        builder.clear_to(bottom);
        builder.paragraph("Below", BODY, 0.0);
        let column = builder.finish();

        let Item::Frame(frame) = &column.items[0] else {
            panic!("expected frame first");
        };
        let runs = text_runs(&column.items);
        let label = runs.iter().find(|r| r.text == "A").unwrap();
        let label_w = metrics_for(TITLE.font).width_mm("A", TITLE.size_pt);
        assert!((label.x_mm + label_w / 2.0 - (frame.x_mm + frame.width_mm / 2.0)).abs() < 1e-3);
        assert!(label.top_mm > frame.top_mm && label.top_mm + label.height_mm < bottom);

        let beside = runs.iter().find(|r| r.text == "Beside").unwrap();
        assert!((beside.top_mm - frame.top_mm).abs() < 1e-4);
        let below = runs.iter().find(|r| r.text == "Below").unwrap();
        assert!((below.top_mm - bottom).abs() < 1e-4);
    }
}
