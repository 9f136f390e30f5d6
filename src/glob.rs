//! Minimal path globs for include/exclude filters.
//!
//! Patterns are matched against `/`-separated paths relative to the project root.
//! `**` as a whole segment matches zero or more segments; inside a segment `*`
//! matches any run of characters and `?` exactly one.

use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    AnyDepth,
    Literal(Vec<char>),
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .trim()
            .replace('\\', "/")
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| match segment {
                "**" => Segment::AnyDepth,
                other => Segment::Literal(other.chars().collect()),
            })
            .collect();
        Self { segments }
    }

    /// Compile a list of patterns, dropping blank ones
    pub fn compile_all(patterns: &[String]) -> Vec<Self> {
        patterns
            .iter()
            .filter(|pattern| !pattern.trim().is_empty())
            .map(|pattern| Self::new(pattern))
            .collect()
    }

    /// Match a relative path given as a `/`-separated string
    pub fn matches_str(&self, relative: &str) -> bool {
        let parts: Vec<&str> = relative
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();
        match_segments(&self.segments, &parts)
    }

    /// Match a relative filesystem path
    pub fn matches_path(&self, relative: &Path) -> bool {
        self.matches_str(&to_slash_path(relative))
    }
}

/// Render a relative path with `/` separators, dropping `.` components
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn match_segments(pattern: &[Segment], parts: &[&str]) -> bool {
    match pattern.split_first() {
        None => parts.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=parts.len()).any(|skip| match_segments(rest, &parts[skip..]))
        }
        Some((Segment::Literal(literal), rest)) => match parts.split_first() {
            Some((head, tail)) => {
                let text: Vec<char> = head.chars().collect();
                match_component(literal, &text) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

fn match_component(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => (0..=text.len()).any(|skip| match_component(rest, &text[skip..])),
        Some(('?', rest)) => !text.is_empty() && match_component(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && match_component(rest, &text[1..]),
    }
}
