//! The pinned images file
//!
//! An INI document with one section per CPU platform and one key per
//! manylinux/musllinux variant, e.g.
//!
//! ```text
//! [x86_64]
//! manylinux2014 = quay.io/pypa/manylinux2014_x86_64:2024-06-01-abc
//! musllinux_1_2 = quay.io/pypa/musllinux_1_2_x86_64:2024-06-01-abc
//! ```
//!
//! Sections and keys keep the order they were first inserted in.

use crate::error::PinsError;
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;


/// Resolved image references, `platform -> variant -> name:tag`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedImages {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl PinnedImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `reference` for (`platform`, `variant`); a later insert for the same pair wins
    pub fn insert(&mut self, platform: &str, variant: &str, reference: String) {
        self.sections
            .entry(platform.to_string())
            .or_default()
            .insert(variant.to_string(), reference);
    }

    pub fn get(&self, platform: &str, variant: &str) -> Option<&str> {
        self.sections
            .get(platform)
            .and_then(|section| section.get(variant))
            .map(String::as_str)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section(&self, platform: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(platform)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of (platform, variant) entries
    pub fn len(&self) -> usize {
        self.sections.values().map(IndexMap::len).sum()
    }

    /// Render as INI text. Each section ends with a blank line.
    pub fn to_ini(&self) -> String {
        let mut out = String::new();
        for (platform, entries) in &self.sections {
            let _ = writeln!(out, "[{}]", platform);
            for (variant, reference) in entries {
                let _ = writeln!(out, "{} = {}", variant, reference);
            }
            out.push('\n');
        }
        out
    }

    /// Parse INI text in the format produced by [`PinnedImages::to_ini`]
    ///
    /// `key: value` entries, blank lines and `#`/`;` comment lines are accepted too.
    pub fn parse_ini(text: &str) -> Result<Self, PinsError> {
        let mut pins = PinnedImages::new();
        let mut current: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| PinsError::MalformedSection {
                        line: line_no,
                        content: raw.to_string(),
                    })?;
                pins.sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (key, value) = split_entry(line).ok_or_else(|| PinsError::MalformedLine {
                line: line_no,
                content: raw.to_string(),
            })?;
            let section = current
                .as_deref()
                .ok_or(PinsError::EntryOutsideSection { line: line_no })?;
            pins.insert(section, key, value.to_string());
        }

        Ok(pins)
    }

    /// Overwrite `path` with the INI rendering
    pub fn write_to(&self, path: &Path) -> Result<(), PinsError> {
        std::fs::write(path, self.to_ini())?;
        info!("Wrote {} pinned images to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, PinsError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_ini(&text)
    }
}

/// Split `key = value` or `key: value` at the first delimiter
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(|c: char| c == '=' || c == ':')?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}
