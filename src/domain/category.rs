//! Event category style table.
//!
//! Maps each event category name to its marker encoding. New event kinds are
//! added by extending the table; the chart builder never matches on names.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    Circle,
    Square,
    Diamond,
    Cross,
    X,
    TriangleUp,
    TriangleDown,
    Star,
}

impl MarkerShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerShape::Circle => "circle",
            MarkerShape::Square => "square",
            MarkerShape::Diamond => "diamond",
            MarkerShape::Cross => "cross",
            MarkerShape::X => "x",
            MarkerShape::TriangleUp => "triangle-up",
            MarkerShape::TriangleDown => "triangle-down",
            MarkerShape::Star => "star",
        }
    }
}

impl FromStr for MarkerShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Ok(MarkerShape::Circle),
            "square" => Ok(MarkerShape::Square),
            "diamond" => Ok(MarkerShape::Diamond),
            "cross" => Ok(MarkerShape::Cross),
            "x" => Ok(MarkerShape::X),
            "triangle-up" => Ok(MarkerShape::TriangleUp),
            "triangle-down" => Ok(MarkerShape::TriangleDown),
            "star" => Ok(MarkerShape::Star),
            other => Err(format!("unknown marker shape '{other}'")),
        }
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fields the renderer shows on hover, e.g. `text+x+y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverInfo {
    pub x: bool,
    pub y: bool,
    pub name: bool,
    pub text: bool,
}

impl HoverInfo {
    pub const TEXT_X_Y: HoverInfo = HoverInfo {
        x: true,
        y: true,
        name: false,
        text: true,
    };
    pub const X_Y_NAME: HoverInfo = HoverInfo {
        x: true,
        y: true,
        name: true,
        text: false,
    };
    pub const ALL: HoverInfo = HoverInfo {
        x: true,
        y: true,
        name: true,
        text: true,
    };
}

impl FromStr for HoverInfo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut info = HoverInfo::default();
        for flag in s.split('+').map(str::trim) {
            match flag {
                "x" => info.x = true,
                "y" => info.y = true,
                "name" => info.name = true,
                "text" => info.text = true,
                "all" => info = HoverInfo::ALL,
                other => return Err(format!("unknown hover flag '{other}'")),
            }
        }
        if info == HoverInfo::default() {
            return Err("hover mode must name at least one field".into());
        }
        Ok(info)
    }
}

impl fmt::Display for HoverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<&str> = [
            (self.text, "text"),
            (self.x, "x"),
            (self.y, "y"),
            (self.name, "name"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        f.write_str(&flags.join("+"))
    }
}

impl Serialize for HoverInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub name: String,
    /// Legend label; falls back to `name`.
    pub label: Option<String>,
    pub marker: MarkerShape,
    pub color: String,
    pub size: f64,
    pub opacity: f64,
    pub hover: HoverInfo,
}

impl CategoryStyle {
    pub fn new(name: impl Into<String>, marker: MarkerShape, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            marker,
            color: color.into(),
            size: 8.0,
            opacity: 0.7,
            hover: HoverInfo::TEXT_X_Y,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn sized(mut self, size: f64, opacity: f64) -> Self {
        self.size = size;
        self.opacity = opacity;
        self
    }

    pub fn hover(mut self, hover: HoverInfo) -> Self {
        self.hover = hover;
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn matches(&self, category: &str) -> bool {
        self.name.eq_ignore_ascii_case(category.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    LlmDecisions,
    RsiLowrider,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "llm" => Ok(Preset::LlmDecisions),
            "lowrider" => Ok(Preset::RsiLowrider),
            other => Err(format!("unknown preset '{other}' (expected llm or lowrider)")),
        }
    }
}

/// Ordered category styles; order drives trace and legend order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    styles: Vec<CategoryStyle>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::LlmDecisions => Self::llm_decisions(),
            Preset::RsiLowrider => Self::rsi_lowrider(),
        }
    }

    /// ENTER / SKIP / REVERSE markers for LLM decision evaluations.
    pub fn llm_decisions() -> Self {
        let mut table = Self::new();
        table.upsert(CategoryStyle::new("ENTER", MarkerShape::Circle, "green"));
        table.upsert(CategoryStyle::new("SKIP", MarkerShape::Circle, "red"));
        table.upsert(CategoryStyle::new("REVERSE", MarkerShape::Circle, "purple"));
        table
    }

    /// Ladder events emitted by RSI Lowrider backtests.
    pub fn rsi_lowrider() -> Self {
        let mut table = Self::new();
        table.upsert(
            CategoryStyle::new("ANCHOR", MarkerShape::TriangleUp, "rgba(34,197,94,0.9)")
                .labelled("Anchor Entry")
                .sized(10.0, 1.0)
                .hover(HoverInfo::X_Y_NAME),
        );
        table.upsert(
            CategoryStyle::new("RUNG_ADDED", MarkerShape::Circle, "rgba(59,130,246,0.9)")
                .labelled("Rung Added")
                .sized(8.0, 1.0)
                .hover(HoverInfo::ALL),
        );
        table.upsert(
            CategoryStyle::new("TP_HIT", MarkerShape::Star, "rgba(250,204,21,0.95)")
                .labelled("TP Hit")
                .sized(10.0, 1.0)
                .hover(HoverInfo::X_Y_NAME),
        );
        table.upsert(
            CategoryStyle::new("RUNG_FILLED", MarkerShape::Diamond, "rgba(14,165,233,0.9)")
                .labelled("Rung Filled")
                .sized(8.0, 1.0)
                .hover(HoverInfo::ALL),
        );
        table.upsert(
            CategoryStyle::new("POSITION_CLOSED", MarkerShape::X, "rgba(239,68,68,0.9)")
                .labelled("Position Closed")
                .sized(9.0, 1.0)
                .hover(HoverInfo::ALL),
        );
        table
    }

    /// Replace a style with the same name in place, or append it.
    pub fn upsert(&mut self, style: CategoryStyle) {
        match self.styles.iter_mut().find(|s| s.matches(&style.name)) {
            Some(existing) => *existing = style,
            None => self.styles.push(style),
        }
    }

    pub fn get(&self, category: &str) -> Option<&CategoryStyle> {
        self.styles.iter().find(|s| s.matches(category))
    }

    pub fn position(&self, category: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.matches(category))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryStyle> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
