//! License identifiers and body rendering.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author written into a license when none is configured.
pub const DEFAULT_AUTHOR: &str = "[Your Name]";

/// The closed set of licenses Sprout can write.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum License {
    #[default]
    Mit,
    Apache,
    Gpl,
    Bsd,
    Cc0,
}

impl License {
    /// Every license, in display order.
    pub const ALL: [License; 5] = [
        License::Mit,
        License::Apache,
        License::Gpl,
        License::Bsd,
        License::Cc0,
    ];

    /// Lowercase identifier used on the command line and in file names.
    pub fn id(&self) -> &'static str {
        match self {
            License::Mit => "mit",
            License::Apache => "apache",
            License::Gpl => "gpl",
            License::Bsd => "bsd",
            License::Cc0 => "cc0",
        }
    }

    /// Parse an identifier, ignoring case.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Fill the `{{year}}` and `{{author}}` placeholders of a license body.
pub fn render(body: &str, year: i32, author: Option<&str>) -> String {
    let author = author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUTHOR);
    body.replace("{{year}}", &year.to_string())
        .replace("{{author}}", author)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for license in License::ALL {
            assert_eq!(License::from_id(license.id()), Some(license));
        }
        assert_eq!(License::from_id("MIT"), Some(License::Mit));
        assert_eq!(License::from_id("wtfpl"), None);
    }

    #[test]
    fn default_is_mit() {
        assert_eq!(License::default(), License::Mit);
    }

    #[test]
    fn render_fills_placeholders() {
        let text = render("Copyright (c) {{year}} {{author}}", 2026, Some("Ada"));
        assert_eq!(text, "Copyright (c) 2026 Ada");
    }

    #[test]
    fn render_falls_back_to_placeholder_author() {
        assert_eq!(render("{{author}}", 2026, None), DEFAULT_AUTHOR);
        assert_eq!(render("{{author}}", 2026, Some("  ")), DEFAULT_AUTHOR);
    }

    #[test]
    fn value_enum_accepts_lowercase_ids() {
        let parsed = License::from_str("apache", true).unwrap();
        assert_eq!(parsed, License::Apache);
    }
}
