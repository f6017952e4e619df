//! Screens and user actions.

use serde::{Deserialize, Serialize};

/// The two mutually exclusive screens. Derived purely from the onboarding flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Onboarding,
    CourseList,
}

impl Screen {
    pub fn from_flag(onboarding_completed: bool) -> Self {
        if onboarding_completed {
            Self::CourseList
        } else {
            Self::Onboarding
        }
    }

    /// Whether `action` does anything on this screen.
    pub fn accepts(&self, action: &Action) -> bool {
        matches!(
            (self, action),
            (Screen::Onboarding, Action::Continue)
                | (Screen::CourseList, Action::Reset)
                | (Screen::CourseList, Action::ToggleCourse(_))
                | (_, Action::Quit)
        )
    }

    /// The flag value `action` asks to persist, if it is a transition.
    pub fn flag_for(&self, action: &Action) -> Option<bool> {
        match (self, action) {
            (Screen::Onboarding, Action::Continue) => Some(true),
            (Screen::CourseList, Action::Reset) => Some(false),
            _ => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Onboarding => "onboarding",
            Self::CourseList => "course_list",
        };
        write!(f, "{s}")
    }
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Acknowledge the onboarding screen.
    Continue,
    /// Forget that onboarding was completed.
    Reset,
    /// Expand or collapse the card with this course code.
    ToggleCourse(String),
    Quit,
}
