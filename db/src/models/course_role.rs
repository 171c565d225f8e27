//! User-course membership backing the two request authorization levels.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Grants a user a role on a course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_roles")]
pub struct Model {
    /// User ID (the JWT subject claim).
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// Course ID as `org/course/run`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: String,

    pub role: Role,
}

/// Role a user holds within a course.
///
/// Staff can moderate and grade; students can view their own grading state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "staff")]
    Staff,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Grants `role` to a user on a course.
    pub async fn assign(
        db: &DatabaseConnection,
        user_id: i64,
        course_id: &str,
        role: Role,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id.to_string()),
            role: Set(role),
        };
        active.insert(db).await
    }

    /// True when the user holds exactly `role` on the course.
    pub async fn is_in_role(
        db: &DatabaseConnection,
        user_id: i64,
        course_id: &str,
        role: Role,
    ) -> Result<bool, DbErr> {
        let row = Entity::find_by_id((user_id, course_id.to_string()))
            .one(db)
            .await?;
        Ok(row.is_some_and(|r| r.role == role))
    }

    /// True when the user holds any of `roles` on the course.
    pub async fn has_any_role(
        db: &DatabaseConnection,
        user_id: i64,
        course_id: &str,
        roles: &[Role],
    ) -> Result<bool, DbErr> {
        let row = Entity::find_by_id((user_id, course_id.to_string()))
            .one(db)
            .await?;
        Ok(row.is_some_and(|r| roles.contains(&r.role)))
    }
}
