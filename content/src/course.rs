use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::ContentError;

/// Structured course identity: organization, course code, and run.
///
/// Courses are addressed everywhere as `org/course/run` (e.g.
/// `MITx/6.002x/2013_Spring`). The composite string form only appears at the
/// system boundary; interior code passes this key around instead of
/// re-splitting strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    pub org: String,
    pub course: String,
    pub run: String,
}

impl CourseKey {
    pub fn new(org: impl Into<String>, course: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            course: course.into(),
            run: run.into(),
        }
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org, self.course, self.run)
    }
}

impl FromStr for CourseKey {
    type Err = ContentError;

    /// Parses `org/course/run`. All three segments must be present and
    /// non-empty; anything else is rejected up front rather than failing
    /// deep inside a content lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [org, course, run] if !org.is_empty() && !course.is_empty() && !run.is_empty() => {
                Ok(CourseKey::new(*org, *course, *run))
            }
            _ => Err(ContentError::InvalidCourseKey(s.to_string())),
        }
    }
}

/// A course as known to the content store.
#[derive(Debug, Clone)]
pub struct Course {
    pub key: CourseKey,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_segment_key() {
        let key: CourseKey = "MITx/6.002x/2013_Spring".parse().unwrap();
        assert_eq!(key.org, "MITx");
        assert_eq!(key.course, "6.002x");
        assert_eq!(key.run, "2013_Spring");
    }

    #[test]
    fn display_round_trips() {
        let key: CourseKey = "edX/demo/2014".parse().unwrap();
        assert_eq!(key.to_string(), "edX/demo/2014");
    }

    #[test]
    fn rejects_two_segment_key() {
        let err = "MITx/6.002x".parse::<CourseKey>().unwrap_err();
        assert!(matches!(err, ContentError::InvalidCourseKey(_)));
    }

    #[test]
    fn rejects_empty_segment() {
        assert!("MITx//2013_Spring".parse::<CourseKey>().is_err());
        assert!("".parse::<CourseKey>().is_err());
    }

    #[test]
    fn rejects_extra_segments() {
        assert!("a/b/c/d".parse::<CourseKey>().is_err());
    }
}
