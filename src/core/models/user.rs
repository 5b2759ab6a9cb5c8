use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::schema::{Checker, Input, Issue, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserParams {
    pub name: Option<Input>,
    pub email: Option<Input>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub name: Option<Input>,
    pub email: Option<Input>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub email_eq: Option<String>,
}

impl Schema for Insert {
    type Raw = NewUserParams;

    fn safe_parse(raw: NewUserParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let name = checker.required("name", raw.name);
        let email = checker.required("email", raw.email);
        let email = checker.email("email", email);
        checker.finish(Insert { name, email })
    }
}

impl Schema for Patch {
    type Raw = UpdateUserParams;

    fn safe_parse(raw: UpdateUserParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let name = checker.optional("name", raw.name);
        let email = checker.optional("email", raw.email).map(|e| checker.email("email", e));
        checker.finish(Patch { name, email })
    }
}
