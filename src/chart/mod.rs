//! Static chart rendering.
//!
//! Every render call draws onto its own in-memory SVG canvas and hands
//! the finished document back inside a [`Chart`], together with the
//! numeric labels drawn on it.

pub mod renderer;

pub use renderer::*;

use serde::Serialize;

/// Kind of chart drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    GroupedBar,
    Line,
}

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    /// Size a canvas from a figure size in inches.
    pub fn from_inches(width: f64, height: f64, pixels_per_inch: u32) -> Self {
        let ppi = f64::from(pixels_per_inch);
        Self {
            width: (width * ppi).round().max(1.0) as u32,
            height: (height * ppi).round().max(1.0) as u32,
        }
    }
}

/// A rendered chart.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    /// File-name stem derived from the title.
    pub slug: String,
    /// Labels drawn on the chart, e.g. `"Low Fat: 71.24%"`.
    pub labels: Vec<String>,
    /// The SVG document. Written to disk separately, never serialized.
    #[serde(skip)]
    pub svg: String,
}

impl Chart {
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.slug)
    }
}

/// Lowercase a title into a file-name stem: `"Sales by Fat Content"` -> `"sales-by-fat-content"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
