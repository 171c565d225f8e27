//! The list of problems a student has submitted for grading.
//!
//! Fetched from the grading service, then annotated with navigable URLs
//! resolved through the content store.

use serde_json::Value;
use tracing::{error, info};

use content::locator::generate_problem_url;
use content::{ContentStore, CourseKey};

use crate::services::ora::GradingService;

/// Student-facing message shown when the grading service cannot be reached
/// or returns something unusable.
pub const STUDENT_ERROR_MESSAGE: &str =
    "Error occurred while contacting the grading service.  Please notify course staff.";

/// A student's problem list as fetched from the grading service.
///
/// Entries are opaque service records; this type only owns fetching them and
/// attaching display URLs.
#[derive(Debug)]
pub struct StudentProblemList {
    course_key: CourseKey,
    student_id: String,
    problems: Vec<Value>,
    /// Student-facing error text when the fetch failed.
    pub error_text: String,
}

impl StudentProblemList {
    pub fn new(course_key: CourseKey, student_id: impl Into<String>) -> Self {
        Self {
            course_key,
            student_id: student_id.into(),
            problems: Vec::new(),
            error_text: String::new(),
        }
    }

    /// Fetches the problem list from the grading service.
    ///
    /// Returns `true` when a well-formed, successful response came back.
    /// On any service or parse failure, records student-facing error text
    /// and returns `false`; the caller renders the error instead of a list.
    pub async fn fetch_from_grading_service(&mut self, grader: &dyn GradingService) -> bool {
        let course_id = self.course_key.to_string();
        let raw = match grader
            .get_student_problem_list(&course_id, &self.student_id)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    course = %course_id,
                    error = %err,
                    "Could not fetch student problem list from the grading service"
                );
                self.error_text = STUDENT_ERROR_MESSAGE.to_string();
                return false;
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!(
                    course = %course_id,
                    error = %err,
                    "Could not parse student problem list from the grading service response"
                );
                self.error_text = STUDENT_ERROR_MESSAGE.to_string();
                return false;
            }
        };

        if !parsed.get("success").and_then(Value::as_bool).unwrap_or(false) {
            self.error_text = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(STUDENT_ERROR_MESSAGE)
                .to_string();
            return false;
        }

        self.problems = parsed
            .get("problem_list")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        true
    }

    /// Annotates each fetched problem with a navigable `problem_url`.
    ///
    /// Problems whose location no longer resolves in the course are dropped
    /// and logged; a stale entry must not break the rest of the list.
    pub fn add_problem_data(&self, store: &ContentStore, base_course_url: &str) -> Vec<Value> {
        let mut valid_problems = Vec::new();

        for problem in &self.problems {
            let Some(location) = problem.get("location").and_then(Value::as_str) else {
                info!(course = %self.course_key, "Dropping problem entry without a location");
                continue;
            };

            match store.path_to_location(&self.course_key, location) {
                Ok(path) => {
                    let url = generate_problem_url(base_course_url, &self.course_key, &path);
                    let mut annotated = problem.clone();
                    if let Some(fields) = annotated.as_object_mut() {
                        fields.insert("problem_url".to_string(), Value::String(url));
                    }
                    valid_problems.push(annotated);
                }
                Err(err) => {
                    info!(
                        course = %self.course_key,
                        location,
                        error = %err,
                        "Dropping problem with unresolvable location"
                    );
                }
            }
        }

        valid_problems
    }
}
