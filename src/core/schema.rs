use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    InvalidString,
    TooSmall,
}

/// One failing field. Serialized as `{ code, path, message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(code: IssueCode, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            path: if field.is_empty() { vec![] } else { vec![field.to_owned()] },
            message: message.into(),
        }
    }
}

/// A body field as it arrived, before its type is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Text(String),
    Other(Value),
}

impl Input {
    fn received(&self) -> &'static str {
        match self {
            Input::Text(_) | Input::Other(Value::String(_)) => "string",
            Input::Other(Value::Null) => "null",
            Input::Other(Value::Bool(_)) => "boolean",
            Input::Other(Value::Number(_)) => "number",
            Input::Other(Value::Array(_)) => "array",
            Input::Other(Value::Object(_)) => "object",
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Text(value.to_owned())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Text(value)
    }
}

pub const REQUIRED: &str = "Required";
pub const TOO_SMALL: &str = "String must contain at least 1 character(s)";
pub const INVALID_UUID: &str = "Invalid uuid";
pub const INVALID_EMAIL: &str = "Invalid email";

/// A validated shape built from its loosely-typed request form.
pub trait Schema: Sized {
    type Raw;

    fn safe_parse(raw: Self::Raw) -> Result<Self, Vec<Issue>>;

    fn parse(raw: Self::Raw) -> Result<Self, Error> {
        Self::safe_parse(raw).map_err(Error::Validation)
    }
}

/// Collects issues field by field so a single pass reports every failure.
#[derive(Debug, Default)]
pub struct Checker {
    issues: Vec<Issue>,
    messages: &'static [(&'static str, &'static str)],
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the message reported for a missing or empty field.
    pub fn with_messages(messages: &'static [(&'static str, &'static str)]) -> Self {
        Self { issues: vec![], messages }
    }

    fn message_for(&self, field: &str) -> Option<&'static str> {
        self.messages.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    /// Accepts a string field; anything else is an `invalid_type` issue.
    pub fn text(&mut self, field: &str, value: Input) -> Option<String> {
        match value {
            Input::Text(v) => Some(v),
            other => {
                let msg = format!("Expected string, received {}", other.received());
                self.issues.push(Issue::new(IssueCode::InvalidType, field, msg));
                None
            }
        }
    }

    pub fn required(&mut self, field: &str, value: Option<Input>) -> String {
        let value = match value {
            Some(v) => v,
            None => {
                let msg = self.message_for(field).unwrap_or(REQUIRED);
                self.issues.push(Issue::new(IssueCode::InvalidType, field, msg));
                return String::new();
            }
        };
        match self.text(field, value) {
            Some(v) => self.non_empty(field, v),
            None => String::new(),
        }
    }

    pub fn optional(&mut self, field: &str, value: Option<Input>) -> Option<String> {
        let value = self.text(field, value?)?;
        Some(self.non_empty(field, value))
    }

    /// Blank input is rejected, but the value is kept exactly as submitted.
    fn non_empty(&mut self, field: &str, value: String) -> String {
        if value.trim().is_empty() {
            let msg = self.message_for(field).unwrap_or(TOO_SMALL);
            self.issues.push(Issue::new(IssueCode::TooSmall, field, msg));
        }
        value
    }

    pub fn uuid(&mut self, field: &str, value: Option<String>) -> Uuid {
        match value {
            None => {
                self.issues.push(Issue::new(IssueCode::InvalidType, field, REQUIRED));
                Uuid::nil()
            }
            Some(v) => self.parse_uuid(field, &v),
        }
    }

    pub fn parse_uuid(&mut self, field: &str, value: &str) -> Uuid {
        match Uuid::parse_str(value.trim()) {
            Ok(id) => id,
            Err(_) => {
                self.issues.push(Issue::new(IssueCode::InvalidString, field, INVALID_UUID));
                Uuid::nil()
            }
        }
    }

    pub fn email(&mut self, field: &str, value: String) -> String {
        if value.is_empty() {
            return value;
        }
        let valid = match value.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace),
            None => false,
        };
        if !valid {
            self.issues.push(Issue::new(IssueCode::InvalidString, field, INVALID_EMAIL));
        }
        value
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn finish<T>(self, value: T) -> Result<T, Vec<Issue>> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.issues)
        }
    }
}

/// Combines two independent parses, reporting the issues of both.
pub fn both<A, B>(a: Result<A, Vec<Issue>>, b: Result<B, Vec<Issue>>) -> Result<(A, B), Error> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut ia), Err(ib)) => {
            ia.extend(ib);
            Err(Error::Validation(ia))
        }
        (Err(i), _) | (_, Err(i)) => Err(Error::Validation(i)),
    }
}

/// Groups issue messages by their top-level field.
pub fn flatten(issues: &[Issue]) -> BTreeMap<String, Vec<String>> {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for issue in issues {
        let key = issue.path.first().cloned().unwrap_or_default();
        fields.entry(key).or_default().push(issue.message.clone());
    }
    fields
}

/// Raw id-only shape, as it arrives in `?id=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

impl From<&str> for IdParams {
    fn from(id: &str) -> Self {
        Self { id: Some(id.to_owned()) }
    }
}

impl From<String> for IdParams {
    fn from(id: String) -> Self {
        Self { id: Some(id) }
    }
}

impl From<Uuid> for IdParams {
    fn from(id: Uuid) -> Self {
        Self { id: Some(id.to_string()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id(pub Uuid);

impl Schema for Id {
    type Raw = IdParams;

    fn safe_parse(raw: IdParams) -> Result<Self, Vec<Issue>> {
        let mut checker = Checker::new();
        let id = checker.uuid("id", raw.id);
        checker.finish(Id(id))
    }
}
