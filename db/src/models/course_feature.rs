//! Per-course feature toggles.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

/// Enables specific features on a course-by-course basis.
///
/// A feature is on only when a row says so; absence of a row means disabled.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_features")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The course these features are attached to, as `org/course/run`.
    pub course_id: String,

    /// Whether to expose email-to-instructor for the course.
    pub enable_email: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns whether instructor email is enabled for the given course id.
    ///
    /// If email has not been explicitly enabled, returns `false`.
    pub async fn email_enabled(db: &DatabaseConnection, course_id: &str) -> Result<bool, DbErr> {
        let row = Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::EnableEmail.eq(true))
            .one(db)
            .await?;
        Ok(row.is_some())
    }

    /// Enables instructor email for a course.
    ///
    /// Course-configuration tooling owns the write path; request handlers
    /// only ever read the flag.
    pub async fn enable_email_for(db: &DatabaseConnection, course_id: &str) -> Result<Self, DbErr> {
        let active = ActiveModel {
            course_id: Set(course_id.to_string()),
            enable_email: Set(true),
            ..Default::default()
        };
        active.insert(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    const COURSE: &str = "MITx/6.002x/2013_Spring";

    #[tokio::test]
    async fn disabled_when_no_row_exists() {
        let db = setup_test_db().await;
        assert!(!Model::email_enabled(&db, COURSE).await.unwrap());
    }

    #[tokio::test]
    async fn enabled_when_row_exists() {
        let db = setup_test_db().await;
        Model::enable_email_for(&db, COURSE).await.unwrap();
        assert!(Model::email_enabled(&db, COURSE).await.unwrap());
    }

    #[tokio::test]
    async fn scoped_to_the_exact_course_id() {
        let db = setup_test_db().await;
        Model::enable_email_for(&db, COURSE).await.unwrap();
        assert!(!Model::email_enabled(&db, "MITx/6.002x/2013_Fall").await.unwrap());
    }

    #[tokio::test]
    async fn explicit_false_row_stays_disabled() {
        let db = setup_test_db().await;
        let active = ActiveModel {
            course_id: Set(COURSE.to_string()),
            enable_email: Set(false),
            ..Default::default()
        };
        active.insert(&db).await.unwrap();

        assert!(!Model::email_enabled(&db, COURSE).await.unwrap());
    }
}
