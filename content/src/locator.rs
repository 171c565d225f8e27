//! Locates a navigable peer-grading unit within a course.

use tracing::info;

use crate::course::CourseKey;
use crate::store::ContentStore;

/// Unit category the locator scans for.
pub const PEER_GRADING_CATEGORY: &str = "peergrading";

/// Which of several resolvable units wins the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Stop at the first unit with a resolvable path.
    FirstMatch,
    /// Scan every unit; the last one with a resolvable path wins.
    LastMatch,
}

/// The shipped scan policy. The scan has always kept the last resolvable
/// unit; keep `LastMatch` unless every deployed course is known to hold at
/// most one reachable peer-grading unit.
pub const PEER_UNIT_SCAN_POLICY: ScanPolicy = ScanPolicy::LastMatch;

/// Finds a peer-grading unit in the course that is reachable from the course
/// root, and returns its display URL.
///
/// Only single-problem units are considered; aggregate dashboard units are
/// excluded. Units whose location no longer resolves to a path (stale or
/// orphaned references) are skipped without aborting the scan. Returns
/// `None` when the course has no reachable single-problem peer-grading unit.
pub fn find_peer_grading_unit(
    store: &ContentStore,
    course_key: &CourseKey,
    base_course_url: &str,
) -> Option<String> {
    let items = store.get_items(course_key, PEER_GRADING_CATEGORY);
    let mut problem_url = None;

    for item in items.iter().filter(|i| i.use_for_single_location) {
        let path = match store.path_to_location(course_key, &item.name) {
            Ok(path) => path,
            Err(err) => {
                // Expected data-quality condition: the unit is in an invalid
                // state and may need to be removed from the course.
                info!(
                    unit = %item.name,
                    course = %course_key,
                    error = %err,
                    "Skipping unreachable peer grading unit"
                );
                continue;
            }
        };

        problem_url = Some(generate_problem_url(base_course_url, course_key, &path));
        if PEER_UNIT_SCAN_POLICY == ScanPolicy::FirstMatch {
            break;
        }
    }

    problem_url
}

/// Joins the base course URL, the course key, and resolved path segments into
/// a slash-terminated display URL.
pub fn generate_problem_url(
    base_course_url: &str,
    course_key: &CourseKey,
    path: &[String],
) -> String {
    let mut url = format!("{}/{}/", base_course_url.trim_end_matches('/'), course_key);
    for segment in path.iter().filter(|s| !s.is_empty()) {
        url.push_str(segment);
        url.push('/');
    }
    url
}
