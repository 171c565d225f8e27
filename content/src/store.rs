use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::course::{Course, CourseKey};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid course key: {0}")]
    InvalidCourseKey(String),

    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("no path to item {location} in course {course}")]
    NoPathToItem { location: String, course: String },

    #[error("failed to read content manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse content manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_true() -> bool {
    true
}

/// A leaf unit in a course tree.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentUnit {
    /// Unit name, unique within its course.
    pub name: String,

    /// Unit kind (e.g. `peergrading`).
    pub category: String,

    #[serde(default)]
    pub display_name: String,

    /// True for units tied to a single problem. Aggregate dashboard units
    /// set this to false. Absent in the manifest means true.
    #[serde(default = "default_true")]
    pub use_for_single_location: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct Section {
    name: String,
    #[serde(default)]
    units: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Chapter {
    name: String,
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct CourseEntry {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    units: Vec<ContentUnit>,
    #[serde(default)]
    chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    courses: Vec<CourseEntry>,
}

#[derive(Debug)]
struct CourseRecord {
    course: Course,
    units: Vec<ContentUnit>,
    chapters: Vec<Chapter>,
}

/// Read-only index of course structure, keyed by the full course key so two
/// runs of the same course never see each other's units.
#[derive(Debug, Default)]
pub struct ContentStore {
    courses: HashMap<CourseKey, CourseRecord>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the store from a JSON manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path)?;
        Self::from_manifest_str(&text)
    }

    /// Builds the store from manifest JSON text.
    pub fn from_manifest_str(text: &str) -> Result<Self, ContentError> {
        let manifest: Manifest = serde_json::from_str(text)?;
        let mut store = Self::new();
        for entry in manifest.courses {
            let key: CourseKey = entry.id.parse()?;
            store.courses.insert(
                key.clone(),
                CourseRecord {
                    course: Course {
                        key,
                        display_name: entry.display_name,
                    },
                    units: entry.units,
                    chapters: entry.chapters,
                },
            );
        }
        Ok(store)
    }

    /// Registers an empty course. Primarily used by tests and seed tooling.
    pub fn add_course(&mut self, key: CourseKey, display_name: impl Into<String>) {
        self.courses.insert(
            key.clone(),
            CourseRecord {
                course: Course {
                    key,
                    display_name: display_name.into(),
                },
                units: Vec::new(),
                chapters: Vec::new(),
            },
        );
    }

    /// Adds a unit to a course. The unit is orphaned until `add_path`
    /// references it from a section.
    pub fn add_unit(&mut self, key: &CourseKey, unit: ContentUnit) -> Result<(), ContentError> {
        let record = self
            .courses
            .get_mut(key)
            .ok_or_else(|| ContentError::CourseNotFound(key.to_string()))?;
        record.units.push(unit);
        Ok(())
    }

    /// References a unit from a chapter/section pair, creating both as needed.
    pub fn add_path(
        &mut self,
        key: &CourseKey,
        chapter: &str,
        section: &str,
        unit_name: &str,
    ) -> Result<(), ContentError> {
        let record = self
            .courses
            .get_mut(key)
            .ok_or_else(|| ContentError::CourseNotFound(key.to_string()))?;

        let chapter = match record.chapters.iter_mut().find(|c| c.name == chapter) {
            Some(existing) => existing,
            None => {
                record.chapters.push(Chapter {
                    name: chapter.to_string(),
                    sections: Vec::new(),
                });
                record.chapters.last_mut().expect("chapter just pushed")
            }
        };

        let section = match chapter.sections.iter_mut().find(|s| s.name == section) {
            Some(existing) => existing,
            None => {
                chapter.sections.push(Section {
                    name: section.to_string(),
                    units: Vec::new(),
                });
                chapter.sections.last_mut().expect("section just pushed")
            }
        };

        section.units.push(unit_name.to_string());
        Ok(())
    }

    pub fn get_course(&self, key: &CourseKey) -> Option<&Course> {
        self.courses.get(key).map(|record| &record.course)
    }

    /// All units of the given category in the course, in manifest order.
    /// Unknown courses yield an empty list.
    pub fn get_items(&self, key: &CourseKey, category: &str) -> Vec<ContentUnit> {
        self.courses
            .get(key)
            .map(|record| {
                record
                    .units
                    .iter()
                    .filter(|unit| unit.category == category)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves the path segments from the course root to the named unit.
    ///
    /// A unit that exists but is referenced by no section is orphaned and
    /// yields `NoPathToItem`.
    pub fn path_to_location(
        &self,
        key: &CourseKey,
        unit_name: &str,
    ) -> Result<Vec<String>, ContentError> {
        let record = self
            .courses
            .get(key)
            .ok_or_else(|| ContentError::CourseNotFound(key.to_string()))?;

        for chapter in &record.chapters {
            for section in &chapter.sections {
                if section.units.iter().any(|name| name == unit_name) {
                    return Ok(vec![
                        "courseware".to_string(),
                        chapter.name.clone(),
                        section.name.clone(),
                    ]);
                }
            }
        }

        Err(ContentError::NoPathToItem {
            location: unit_name.to_string(),
            course: key.to_string(),
        })
    }
}
