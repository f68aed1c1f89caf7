//! Read-only progress summary for a project.

use std::collections::HashSet;
use std::fmt::Write;

use crate::models::{is_interviewed, parse_outline_points, scene_block, OutlinePoint};
use crate::store::{ArtifactError, ProjectStore};

/// How far a project has progressed through the phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStatus {
    pub has_raw_text: bool,
    /// `None` when no outline exists yet.
    pub outline_points: Option<usize>,
    /// Records in the interview artifact.
    pub interviewed: usize,
    /// Outline points with no interview record, in outline order.
    pub remaining: Vec<OutlinePoint>,
    /// Interviewed points whose scene heading appears in the draft.
    pub drafted: usize,
}

impl ProjectStatus {
    pub fn collect(store: &ProjectStore) -> Result<Self, ArtifactError> {
        let has_raw_text = optional(store.load_raw_text())?.is_some();
        let outline = optional(store.load_outline())?;
        let records = store.load_interview_records()?;
        let draft = optional(store.load_draft())?.unwrap_or_default();

        let (outline_points, remaining) = match outline {
            Some(outline) => {
                let points = parse_outline_points(&outline);
                let mut seen = HashSet::new();
                let remaining = points
                    .iter()
                    .filter(|p| !is_interviewed(&records, p) && seen.insert(p.as_str()))
                    .cloned()
                    .collect();
                (Some(points.len()), remaining)
            }
            None => (None, Vec::new()),
        };

        let headings: HashSet<&str> = draft.lines().collect();
        let drafted = records
            .iter()
            .filter(|r| headings.contains(scene_heading(&r.outline_point).as_str()))
            .count();

        Ok(Self {
            has_raw_text,
            outline_points,
            interviewed: records.len(),
            remaining,
            drafted,
        })
    }

    /// Human-readable summary, one fact per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let present = |yes: bool| if yes { "present" } else { "missing" };

        let _ = writeln!(out, "raw text:     {}", present(self.has_raw_text));
        match self.outline_points {
            Some(n) => {
                let _ = writeln!(out, "outline:      {} points", n);
            }
            None => {
                let _ = writeln!(out, "outline:      missing");
            }
        }
        let _ = writeln!(out, "interviewed:  {}", self.interviewed);
        let _ = writeln!(out, "drafted:      {} of {}", self.drafted, self.interviewed);

        if !self.remaining.is_empty() {
            let _ = writeln!(out, "remaining:");
            for point in &self.remaining {
                let _ = writeln!(out, "  {}", point);
            }
        }
        out
    }
}

fn scene_heading(point: &str) -> String {
    scene_block(point, "")
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn optional<T>(result: Result<T, ArtifactError>) -> Result<Option<T>, ArtifactError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
