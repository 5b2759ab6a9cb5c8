use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::models::voter::Voter;
use crate::core::schema::{Checker, Input, Issue, Schema};

/// National id of the leader that owns unassigned voters.
pub const SENTINEL_NATIONAL_ID: &str = "noExist";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Leader {
    pub fn is_sentinel(&self) -> bool {
        self.national_id == SENTINEL_NATIONAL_ID
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderWithVoters {
    pub leader: Leader,
    pub voters: Vec<Voter>,
}

/// Id of the leader standing in for the `noExist` marker, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultLeader(Uuid);

impl DefaultLeader {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaderParams {
    pub name: Option<Input>,
    pub last_name: Option<Input>,
    pub national_id: Option<Input>,
    pub phone: Option<Input>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaderParams {
    pub name: Option<Input>,
    pub last_name: Option<Input>,
    pub national_id: Option<Input>,
    pub phone: Option<Input>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    /// `Some(None)` clears the phone.
    pub phone: Option<Option<String>>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub national_id_eq: Option<String>,
    pub national_id_ne: Option<String>,
}

/// An optional phone; blank input means no phone.
fn phone(checker: &mut Checker, value: Option<Input>) -> Option<Option<String>> {
    let value = checker.text("phone", value?)?;
    Some(Some(value).filter(|p| !p.trim().is_empty()))
}

impl Schema for Insert {
    type Raw = NewLeaderParams;

    fn safe_parse(raw: NewLeaderParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let insert = Insert {
            name: checker.required("name", raw.name),
            last_name: checker.required("lastName", raw.last_name),
            national_id: checker.required("nationalId", raw.national_id),
            phone: phone(&mut checker, raw.phone).flatten(),
        };
        checker.finish(insert)
    }
}

impl Schema for Patch {
    type Raw = UpdateLeaderParams;

    fn safe_parse(raw: UpdateLeaderParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let patch = Patch {
            name: checker.optional("name", raw.name),
            last_name: checker.optional("lastName", raw.last_name),
            national_id: checker.optional("nationalId", raw.national_id),
            phone: phone(&mut checker, raw.phone),
        };
        checker.finish(patch)
    }
}
