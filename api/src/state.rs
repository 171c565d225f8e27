//! Application state shared across Axum route handlers.
//!
//! Holds the database connection, the read-only course content index, and
//! the grading-service client. Wrapped in cheap clones and passed to
//! handlers via Axum's `State<T>` extractor.

use std::sync::Arc;

use content::ContentStore;
use sea_orm::DatabaseConnection;

use crate::services::ora::GradingService;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    content: Arc<ContentStore>,
    grader: Arc<dyn GradingService>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        content: Arc<ContentStore>,
        grader: Arc<dyn GradingService>,
    ) -> Self {
        Self { db, content, grader }
    }

    /// Shared reference to the SeaORM connection.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Cloned copy of the database connection, for contexts needing ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// The course content index.
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// The external grading-service client.
    pub fn grader(&self) -> &dyn GradingService {
        self.grader.as_ref()
    }
}
