use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::models::leader::{DefaultLeader, Leader, SENTINEL_NATIONAL_ID};
use crate::core::schema::{Checker, Input, Issue, IssueCode, Schema, REQUIRED};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub school: String,
    pub township: String,
    pub desk: String,
    pub leader_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoterWithLeader {
    pub voter: Voter,
    pub leader: Option<Leader>,
}

/// Owner of a voter as submitted by a client: the `noExist` marker or a real leader id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderRef {
    Unassigned,
    Leader(Uuid),
}

impl LeaderRef {
    pub fn resolve(self, default_leader: &DefaultLeader) -> Uuid {
        match self {
            LeaderRef::Unassigned => default_leader.id(),
            LeaderRef::Leader(id) => id,
        }
    }

    fn check(checker: &mut Checker, value: Input) -> Self {
        match checker.text("leaderId", value) {
            Some(v) if v.trim() == SENTINEL_NATIONAL_ID => LeaderRef::Unassigned,
            Some(v) => LeaderRef::Leader(checker.parse_uuid("leaderId", &v)),
            None => LeaderRef::Unassigned,
        }
    }
}

impl fmt::Display for LeaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderRef::Unassigned => f.write_str(SENTINEL_NATIONAL_ID),
            LeaderRef::Leader(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for LeaderRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoterParams {
    pub name: Option<Input>,
    pub last_name: Option<Input>,
    pub national_id: Option<Input>,
    pub school: Option<Input>,
    pub township: Option<Input>,
    pub desk: Option<Input>,
    pub leader_id: Option<Input>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVoterParams {
    pub name: Option<Input>,
    pub last_name: Option<Input>,
    pub national_id: Option<Input>,
    pub school: Option<Input>,
    pub township: Option<Input>,
    pub desk: Option<Input>,
    pub leader_id: Option<Input>,
}

impl From<NewVoterParams> for UpdateVoterParams {
    fn from(p: NewVoterParams) -> Self {
        Self {
            name: p.name,
            last_name: p.last_name,
            national_id: p.national_id,
            school: p.school,
            township: p.township,
            desk: p.desk,
            leader_id: p.leader_id,
        }
    }
}

/// Validated insert params, before the owner marker is resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub school: String,
    pub township: String,
    pub desk: String,
    pub leader_id: LeaderRef,
}

impl Create {
    pub fn safe_parse_with(raw: NewVoterParams, messages: &'static [(&'static str, &'static str)]) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::with_messages(messages);
        let name = checker.required("name", raw.name);
        let last_name = checker.required("lastName", raw.last_name);
        let national_id = checker.required("nationalId", raw.national_id);
        let school = checker.required("school", raw.school);
        let township = checker.required("township", raw.township);
        let desk = checker.required("desk", raw.desk);
        let leader_id = match raw.leader_id {
            Some(v) => LeaderRef::check(&mut checker, v),
            None => {
                checker.push(Issue::new(IssueCode::InvalidType, "leaderId", REQUIRED));
                LeaderRef::Unassigned
            }
        };
        checker.finish(Create {
            name,
            last_name,
            national_id,
            school,
            township,
            desk,
            leader_id,
        })
    }

    pub fn resolve(self, default_leader: &DefaultLeader) -> Insert {
        Insert {
            name: self.name,
            last_name: self.last_name,
            national_id: self.national_id,
            school: self.school,
            township: self.township,
            desk: self.desk,
            leader_id: self.leader_id.resolve(default_leader),
        }
    }
}

impl Schema for Create {
    type Raw = NewVoterParams;

    fn safe_parse(raw: NewVoterParams) -> Result<Self, Vec<Issue>> {
        Self::safe_parse_with(raw, &[])
    }
}

/// Validated partial update, before the owner marker is resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub school: Option<String>,
    pub township: Option<String>,
    pub desk: Option<String>,
    pub leader_id: Option<LeaderRef>,
}

impl Update {
    pub fn resolve(self, default_leader: &DefaultLeader) -> Patch {
        Patch {
            name: self.name,
            last_name: self.last_name,
            national_id: self.national_id,
            school: self.school,
            township: self.township,
            desk: self.desk,
            leader_id: self.leader_id.map(|l| l.resolve(default_leader)),
        }
    }
}

impl Schema for Update {
    type Raw = UpdateVoterParams;

    fn safe_parse(raw: UpdateVoterParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let update = Update {
            name: checker.optional("name", raw.name),
            last_name: checker.optional("lastName", raw.last_name),
            national_id: checker.optional("nationalId", raw.national_id),
            school: checker.optional("school", raw.school),
            township: checker.optional("township", raw.township),
            desk: checker.optional("desk", raw.desk),
            leader_id: raw.leader_id.map(|v| LeaderRef::check(&mut checker, v)),
        };
        checker.finish(update)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub school: String,
    pub township: String,
    pub desk: String,
    pub leader_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub school: Option<String>,
    pub township: Option<String>,
    pub desk: Option<String>,
    pub leader_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub leader_id_eq: Option<Uuid>,
    pub national_id_eq: Option<String>,
}
