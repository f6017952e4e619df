//! Course records shown in the course list.

use serde::Serialize;

/// A course in the catalogue. Instances are compile-time constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Course {
    pub title: &'static str,
    pub code: &'static str,
    pub credit_hours: u32,
    pub description: &'static str,
    pub prerequisites: &'static str,
}

/// The built-in catalogue.
pub const SAMPLE_COURSES: [Course; 3] = [
    Course {
        title: "Introduction to Computer Science",
        code: "CS101",
        credit_hours: 3,
        description: "Learn the basics of programming and computer science.",
        prerequisites: "None",
    },
    Course {
        title: "Data Structures and Algorithms",
        code: "CS201",
        credit_hours: 4,
        description: "Explore data structures, recursion, and algorithms.",
        prerequisites: "CS101",
    },
    Course {
        title: "Operating Systems",
        code: "CS301",
        credit_hours: 4,
        description: "Understand how OS works: processes, threads, memory.",
        prerequisites: "CS201",
    },
];

pub fn sample_courses() -> &'static [Course] {
    &SAMPLE_COURSES
}

/// Look up a course by code, case-insensitively.
pub fn find_course(code: &str) -> Option<&'static Course> {
    SAMPLE_COURSES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// A course as displayed: collapsed by default, expandable for details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCard {
    pub course: Course,
    pub expanded: bool,
}

impl CourseCard {
    pub fn new(course: Course) -> Self {
        Self {
            course,
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Label of the expand/collapse affordance.
    pub fn toggle_label(&self) -> &'static str {
        if self.expanded { "Show Less" } else { "Show More" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_three_courses() {
        let summary: Vec<(&str, u32)> = sample_courses()
            .iter()
            .map(|c| (c.code, c.credit_hours))
            .collect();
        assert_eq!(summary, vec![("CS101", 3), ("CS201", 4), ("CS301", 4)]);
    }

    #[test]
    fn prerequisites_chain() {
        assert_eq!(find_course("CS101").unwrap().prerequisites, "None");
        assert_eq!(find_course("CS201").unwrap().prerequisites, "CS101");
        assert_eq!(find_course("CS301").unwrap().prerequisites, "CS201");
    }

    #[test]
    fn find_course_ignores_case() {
        assert_eq!(find_course(" cs201 ").map(|c| c.code), Some("CS201"));
        assert!(find_course("CS999").is_none());
    }

    #[test]
    fn card_toggles() {
        let mut card = CourseCard::new(SAMPLE_COURSES[0]);
        assert!(!card.expanded);
        assert_eq!(card.toggle_label(), "Show More");

        card.toggle();
        assert!(card.expanded);
        assert_eq!(card.toggle_label(), "Show Less");

        card.toggle();
        assert!(!card.expanded);
    }
}
