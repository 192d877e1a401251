//! Tagged-line descriptor reader
//!
//! Scenario descriptors are line-oriented text. Only two line shapes are
//! contracted:
//! - the required name line, `Имя: "<name>"`
//! - marker lines, `# PhaseSwitcher_<Key>: <value>`, with keys `Tab`,
//!   `Default` and `OrderOnTab`
//!
//! Everything else in the file is passed over without interpretation; this
//! is deliberately not a grammar for the whole format.

use once_cell::sync::Lazy;
use regex::Regex;

static NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*Имя:\s*"(?P<name>[^"]+)""#).expect("name line pattern"));

static MARKER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*PhaseSwitcher_(?P<key>\w+):\s*(?P<value>.*?)\s*$")
        .expect("marker line pattern")
});

/// Classification of a single descriptor line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorLine {
    /// The required name line
    Name(String),
    /// `# PhaseSwitcher_Tab: <phase>`: declares the phase and flips the
    /// tab-marker-found flag, even when the value is empty
    Tab(String),
    /// `# PhaseSwitcher_Default: <value>`: `true` (case-insensitive)
    /// means enabled by default, anything else means disabled
    Default(bool),
    /// `# PhaseSwitcher_OrderOnTab: <value>`: `None` when the value is
    /// not an integer
    OrderOnTab(Option<i64>),
    /// Marker line with a key this subsystem does not recognize
    UnknownMarker { key: String },
    /// Any other line
    Other,
}

/// Classify one line of descriptor text
#[must_use]
pub fn classify_line(line: &str) -> DescriptorLine {
    if let Some(captures) = MARKER_LINE.captures(line) {
        let key = &captures["key"];
        let value = &captures["value"];
        return match key {
            "Tab" => DescriptorLine::Tab(value.to_string()),
            "Default" => DescriptorLine::Default(value.eq_ignore_ascii_case("true")),
            "OrderOnTab" => DescriptorLine::OrderOnTab(value.parse::<i64>().ok()),
            _ => DescriptorLine::UnknownMarker {
                key: key.to_string(),
            },
        };
    }
    if let Some(captures) = NAME_LINE.captures(line) {
        return DescriptorLine::Name(captures["name"].to_string());
    }
    DescriptorLine::Other
}

/// Typed partial record scraped from one descriptor file
///
/// The scan itself is total: any text yields a `DescriptorScan`. Whether
/// the result names a loadable scenario is a separate question answered by
/// [`DescriptorScan::is_admissible`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorScan {
    /// Scenario name, from the first name line found
    pub name: Option<String>,
    /// Declared phase, from the last `Tab` marker
    pub phase_name: Option<String>,
    /// Whether any `Tab` marker was seen at all
    pub tab_marker_found: bool,
    /// Declared default state; false while the marker is absent
    pub default_enabled: bool,
    /// Declared ordering; invalid marker values leave the prior value
    pub sort_order: Option<i64>,
}

impl DescriptorScan {
    /// Scan descriptor text line by line
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        let mut scan = Self::default();
        for line in text.lines() {
            match classify_line(line) {
                DescriptorLine::Name(name) => {
                    // One required name line; the first wins
                    if scan.name.is_none() {
                        scan.name = Some(name);
                    }
                }
                DescriptorLine::Tab(phase) => {
                    scan.tab_marker_found = true;
                    scan.phase_name = Some(phase);
                }
                DescriptorLine::Default(value) => scan.default_enabled = value,
                DescriptorLine::OrderOnTab(Some(order)) => scan.sort_order = Some(order),
                DescriptorLine::OrderOnTab(None)
                | DescriptorLine::UnknownMarker { .. }
                | DescriptorLine::Other => {}
            }
        }
        scan
    }

    /// Whether this descriptor names a loadable, phase-bound scenario
    ///
    /// Requires a name, a seen `Tab` marker, and a non-empty phase. A
    /// name-only file is a helper, not a scenario.
    #[must_use]
    pub fn is_admissible(&self) -> bool {
        self.name.is_some()
            && self.tab_marker_found
            && self.phase_name.as_deref().is_some_and(|p| !p.is_empty())
    }
}
