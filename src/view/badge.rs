use crate::tracker::types::IssueStatus;
use colored::{Color, ColoredString, Colorize};

/// Visual treatment of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeClass {
    Neutral,
    Warning,
    Success,
    Danger,
    Fallback,
}

impl BadgeClass {
    pub fn for_status(status: &IssueStatus) -> Self {
        match status {
            IssueStatus::New => Self::Neutral,
            IssueStatus::Assigned => Self::Warning,
            IssueStatus::Resolved => Self::Success,
            IssueStatus::Closed => Self::Danger,
            IssueStatus::Reopened | IssueStatus::Other(_) => Self::Fallback,
        }
    }

    pub fn for_label(label: &str) -> Self {
        Self::for_status(&IssueStatus::from(label))
    }

    pub fn color(self) -> Color {
        match self {
            Self::Neutral => Color::BrightBlack,
            Self::Warning => Color::Yellow,
            Self::Success => Color::Green,
            Self::Danger => Color::Red,
            Self::Fallback => Color::Magenta,
        }
    }
}

pub fn status_badge(status: &IssueStatus) -> ColoredString {
    format!(" {status} ")
        .on_color(BadgeClass::for_status(status).color())
        .white()
        .bold()
}
