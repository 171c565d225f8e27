pub mod m202601120001_create_course_features;
pub mod m202601120002_create_course_roles;
