//! Renderable views and the text rendering used by the terminal front end.

use crate::courses::CourseCard;
use crate::ui::screen::Screen;

pub const WELCOME_HEADING: &str = "Welcome to Course Explorer!";
pub const CONTINUE_LABEL: &str = "Continue";
pub const RESET_LABEL: &str = "Reset Onboarding";

/// What the controller asks a renderer to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Onboarding,
    CourseList { cards: Vec<CourseCard> },
}

impl View {
    pub fn screen(&self) -> Screen {
        match self {
            Self::Onboarding => Screen::Onboarding,
            Self::CourseList { .. } => Screen::CourseList,
        }
    }

    /// Plain-text rendition of the view, one trailing newline.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        match self {
            Self::Onboarding => {
                lines.push(WELCOME_HEADING.to_string());
                lines.push(String::new());
                lines.push(format!("    [{CONTINUE_LABEL}]"));
            }
            Self::CourseList { cards } => {
                for (i, card) in cards.iter().enumerate() {
                    let course = &card.course;
                    lines.push(format!("{}. {}", i + 1, course.title));
                    lines.push(format!("   Code: {}", course.code));
                    lines.push(format!("   Credits: {}", course.credit_hours));
                    if card.expanded {
                        lines.push(format!("   Description: {}", course.description));
                        lines.push(format!("   Prerequisites: {}", course.prerequisites));
                    }
                    lines.push(format!("   [{}]", card.toggle_label()));
                    lines.push(String::new());
                }
                lines.push(format!("    [{RESET_LABEL}]"));
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Presents views to the user.
pub trait Renderer: Send {
    fn render(&mut self, view: &View);
}
