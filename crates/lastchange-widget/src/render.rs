//! SVG output for widget documents
//!
//! Layout is a single page of fixed width whose height grows with the
//! content. Glyph widths are estimated from the font size, so line wrapping is
//! approximate but fully deterministic: identical inputs give identical bytes.

use crate::colour::Colour;
use crate::compose::{compose, Block, Table, WidgetDocument, BREAK_MARKER};
use crate::types::{CommitSummary, RenderRequest};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use tracing::debug;

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
/// Average advance of a glyph, in ems
const CHAR_WIDTH: f64 = 0.55;
const LINE_HEIGHT: f64 = 1.4;
/// Baseline offset inside a line box, in ems
const BASELINE: f64 = 0.95;
const HEADING_SCALE: f64 = 1.5;
/// Widest text ever put in the date column
const DATE_SAMPLE: &str = "0000-00-00 00:00:00";

const NO_DATA_TEXT: &str = "Oops, no data available!";
const NO_DATA_WIDTH: f64 = 400.0;
const NO_DATA_HEIGHT: f64 = 25.0;

/// Resolved visual parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: f64,
    pub base_font_size: f64,
    pub foreground: Colour,
    pub background: Colour,
}

impl RenderOptions {
    /// Resolve a request, replacing bad colours and sizes with defaults
    pub fn from_request(req: &RenderRequest) -> Self {
        let req = req.sanitized();
        Self {
            width: req.width,
            base_font_size: req.base_font_size,
            foreground: Colour::parse_or(req.foreground_colour.as_deref(), Colour::BLACK),
            background: Colour::parse_or(req.background_colour.as_deref(), Colour::TRANSPARENT),
        }
    }
}

/// Compose and draw the widget for a commit list, or the no-data image when
/// the list is empty
pub fn render_widget(commits: &[CommitSummary], request: &RenderRequest, now: DateTime<Utc>) -> Vec<u8> {
    let request = request.sanitized();
    let opts = RenderOptions::from_request(&request);

    match compose(commits, request.max_commits, now) {
        Some(doc) => {
            debug!(document = %doc.to_markdown(), "Composed widget");
            render(&doc, &opts)
        }
        None => render_no_data(opts.base_font_size, opts.foreground),
    }
}

/// Draw the full widget
pub fn render(doc: &WidgetDocument, opts: &RenderOptions) -> Vec<u8> {
    let mut page = Page::new(opts);

    for (i, block) in doc.blocks.iter().enumerate() {
        match block {
            Block::Heading(text) => {
                if i > 0 {
                    page.y += opts.base_font_size * 0.5;
                }
                page.text_block(text, opts.base_font_size * HEADING_SCALE, true);
                page.y += opts.base_font_size * 0.5;
            }
            Block::Paragraph(text) => {
                page.text_block(text, opts.base_font_size, false);
                page.y += opts.base_font_size * 0.75;
            }
            Block::Table(table) => {
                page.table(table);
                page.y += opts.base_font_size * 0.75;
            }
        }
    }

    page.finish()
}

/// Fixed 400×25 image shown when a repository has no visible commits
pub fn render_no_data(base_font_size: f64, foreground: Colour) -> Vec<u8> {
    let font_size = if base_font_size.is_finite() && base_font_size > 0.0 {
        base_font_size
    } else {
        RenderRequest::DEFAULT_BASE_FONT_SIZE
    };

    let mut svg = String::new();
    open_svg(&mut svg, NO_DATA_WIDTH, NO_DATA_HEIGHT);
    let _ = writeln!(
        svg,
        r#"<text x="5" y="5" dominant-baseline="hanging" font-family="{}" font-size="{}" fill="{}" fill-opacity="{}">{}</text>"#,
        FONT_FAMILY,
        num(font_size),
        foreground.to_hex(),
        foreground.opacity(),
        escape(NO_DATA_TEXT)
    );
    svg.push_str("</svg>\n");
    svg.into_bytes()
}

struct Page<'a> {
    opts: &'a RenderOptions,
    body: String,
    y: f64,
}

impl<'a> Page<'a> {
    fn new(opts: &'a RenderOptions) -> Self {
        Self {
            opts,
            body: String::new(),
            y: 0.0,
        }
    }

    fn text_block(&mut self, text: &str, font_size: f64, bold: bool) {
        for line in wrap(text, self.opts.width, font_size) {
            self.text_line(0.0, self.y, &line, font_size, bold);
            self.y += font_size * LINE_HEIGHT;
        }
    }

    fn text_line(&mut self, x: f64, top: f64, line: &str, font_size: f64, bold: bool) {
        let weight = if bold { r#" font-weight="bold""# } else { "" };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}"{}>{}</text>"#,
            num(x),
            num(top + font_size * BASELINE),
            num(font_size),
            weight,
            escape(line)
        );
    }

    fn table(&mut self, table: &Table) {
        let fs = self.opts.base_font_size;
        let pad = fs * 0.4;
        let width = self.opts.width;
        let date_width = (text_width(DATE_SAMPLE, fs) + 2.0 * pad).min(width / 2.0);
        let message_width = (width - date_width).max(0.0);
        let columns = [(0.0, date_width), (date_width, message_width)];

        let top = self.y;
        let mut row_edges = vec![top];

        self.body.push_str("<g class=\"table\">\n");
        self.table_row("header", &table.header, &columns, pad, true);
        row_edges.push(self.y);
        for row in &table.rows {
            self.table_row("row", row, &columns, pad, false);
            row_edges.push(self.y);
        }

        let stroke = format!(
            r#"stroke="{}" stroke-opacity="{}" stroke-width="1" fill="none""#,
            self.opts.foreground.to_hex(),
            self.opts.foreground.opacity()
        );
        let mut d = String::new();
        for edge in &row_edges {
            let _ = write!(d, "M0 {}H{}", num(*edge), num(width));
        }
        for x in [0.0, date_width, width] {
            let _ = write!(d, "M{} {}V{}", num(x), num(top), num(self.y));
        }
        let _ = writeln!(self.body, r#"<path d="{}" {}/>"#, d, stroke);
        self.body.push_str("</g>\n");
    }

    fn table_row(
        &mut self,
        class: &str,
        cells: &[String; 2],
        columns: &[(f64, f64); 2],
        pad: f64,
        bold: bool,
    ) {
        let fs = self.opts.base_font_size;
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(columns)
            .map(|(cell, (_, w))| {
                cell.split(BREAK_MARKER)
                    .flat_map(|segment| wrap(segment, w - 2.0 * pad, fs))
                    .collect()
            })
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);

        let _ = writeln!(self.body, r#"<g class="{}">"#, class);
        let row_top = self.y + pad;
        for (lines, (x, _)) in wrapped.iter().zip(columns) {
            for (n, line) in lines.iter().enumerate() {
                self.text_line(x + pad, row_top + n as f64 * fs * LINE_HEIGHT, line, fs, bold);
            }
        }
        self.body.push_str("</g>\n");

        self.y += line_count as f64 * fs * LINE_HEIGHT + 2.0 * pad;
    }

    fn finish(self) -> Vec<u8> {
        let height = self.y.max(1.0).ceil();
        let width = self.opts.width;

        let mut svg = String::new();
        open_svg(&mut svg, width, height);
        let _ = writeln!(
            svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
            num(width),
            num(height),
            self.opts.background.to_hex(),
            self.opts.background.opacity()
        );
        let _ = writeln!(
            svg,
            r#"<g font-family="{}" fill="{}" fill-opacity="{}">"#,
            FONT_FAMILY,
            self.opts.foreground.to_hex(),
            self.opts.foreground.opacity()
        );
        svg.push_str(&self.body);
        svg.push_str("</g>\n</svg>\n");
        svg.into_bytes()
    }
}

fn open_svg(svg: &mut String, width: f64, height: f64) {
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(width),
        h = num(height)
    );
}

fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH
}

/// Greedy word wrap; words wider than a line are split by character
fn wrap(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((max_width / (font_size * CHAR_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Compact, locale-independent number formatting (at most two decimals)
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_commits;
    use chrono::TimeZone;

    fn doc(count: usize) -> WidgetDocument {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        compose(&sample_commits(count), 5, now).unwrap()
    }

    fn svg(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_default_options() {
        let opts = RenderOptions::from_request(&RenderRequest::default());
        assert_eq!(opts.foreground, Colour::BLACK);
        assert_eq!(opts.background, Colour::TRANSPARENT);
        assert_eq!(opts.width, 830.0);
    }

    #[test]
    fn test_bad_colours_fall_back() {
        let opts = RenderOptions::from_request(&RenderRequest {
            foreground_colour: Some("not-a-colour".to_string()),
            background_colour: Some("#zzz".to_string()),
            width: 0.0,
            ..RenderRequest::default()
        });
        assert_eq!(opts.foreground, Colour::BLACK);
        assert_eq!(opts.background, Colour::TRANSPARENT);
        assert_eq!(opts.width, 830.0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let opts = RenderOptions::from_request(&RenderRequest::default());
        assert_eq!(render(&doc(3), &opts), render(&doc(3), &opts));
    }

    #[test]
    fn test_render_contains_document() {
        let opts = RenderOptions::from_request(&RenderRequest {
            background_colour: Some("#123456".to_string()),
            ..RenderRequest::default()
        });
        let out = svg(render(&doc(3), &opts));

        assert!(out.starts_with("<?xml"));
        assert!(out.contains(r#"width="830""#));
        assert!(out.contains(r##"fill="#123456" fill-opacity="1""##));
        assert!(out.contains(">Last change</text>"));
        assert!(out.contains("2024-01-01T10:00:00 (5 minutes ago)"));
        assert_eq!(out.matches(r#"<g class="row">"#).count(), 3);
        assert_eq!(out.matches(r#"<g class="header">"#).count(), 1);
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_break_markers_become_separate_lines() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        let mut commits = sample_commits(1);
        commits[0].message = "Subject <tag>\n\nBody & more".to_string();
        let document = compose(&commits, 1, now).unwrap();
        let out = svg(render(
            &document,
            &RenderOptions::from_request(&RenderRequest::default()),
        ));

        assert!(out.contains(">Subject &lt;tag&gt;</text>"));
        assert!(out.contains(">Body &amp; more</text>"));
        assert!(!out.contains("&lt;br&gt;"));
    }

    #[test]
    fn test_no_data_image() {
        let out = svg(render_no_data(14.0, Colour::rgb(255, 0, 0)));
        assert!(out.contains(r#"width="400" height="25""#));
        assert!(out.contains(">Oops, no data available!</text>"));
        assert!(out.contains(r##"fill="#ff0000""##));
        assert!(!out.contains("<path"));
    }

    #[test]
    fn test_no_data_image_is_stable() {
        assert_eq!(
            render_no_data(14.0, Colour::BLACK),
            render_no_data(14.0, Colour::BLACK)
        );
        assert_eq!(
            render_no_data(f64::NAN, Colour::BLACK),
            render_no_data(14.0, Colour::BLACK)
        );
    }

    #[test]
    fn test_render_widget_picks_fallback_for_empty_list() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        let request = RenderRequest {
            foreground_colour: Some("navy".to_string()),
            ..RenderRequest::default()
        };

        assert_eq!(
            render_widget(&[], &request, now),
            render_no_data(14.0, Colour::rgb(0, 0, 128))
        );
        let full = svg(render_widget(&sample_commits(2), &request, now));
        assert_eq!(full.matches(r#"<g class="row">"#).count(), 2);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 100.0, 10.0), vec![String::new()]);
        // 100 / (10 * 0.55) => 18 chars per line
        assert_eq!(
            wrap("the quick brown fox jumps over", 100.0, 10.0),
            vec!["the quick brown", "fox jumps over"]
        );
        assert_eq!(
            wrap(&"a".repeat(40), 100.0, 10.0),
            vec!["a".repeat(18), "a".repeat(18), "a".repeat(4)]
        );
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(830.0), "830");
        assert_eq!(num(13.3), "13.3");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }
}
