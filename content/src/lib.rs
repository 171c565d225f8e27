//! In-memory course content store.
//!
//! Holds the structural view of each course (chapters, sections, and leaf
//! units) that the grading endpoints need: which peer-grading units a course
//! contains, and how to reach them from the course root. The store is loaded
//! once at startup from a JSON manifest and shared read-only across requests.

pub mod course;
pub mod locator;
pub mod store;

pub use course::{Course, CourseKey};
pub use locator::{PEER_GRADING_CATEGORY, PEER_UNIT_SCAN_POLICY, ScanPolicy, find_peer_grading_unit};
pub use store::{ContentError, ContentStore, ContentUnit};
