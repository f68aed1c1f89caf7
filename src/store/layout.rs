//! On-disk layout of a project directory.

use std::fmt;

/// The four files a project directory owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    RawText,
    Outline,
    InterviewData,
    Draft,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Self::RawText,
        Self::Outline,
        Self::InterviewData,
        Self::Draft,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::RawText => "00_raw_text.txt",
            Self::Outline => "01_outline.md",
            Self::InterviewData => "02_interview_data.json",
            Self::Draft => "03_draft.md",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawText => "raw text",
            Self::Outline => "outline",
            Self::InterviewData => "interview data",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
