use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::core::models::leader::SENTINEL_NATIONAL_ID;
use crate::core::models::voter::{Create, LeaderRef, NewVoterParams, UpdateVoterParams, Voter};
use crate::core::schema::{flatten, Input};
use crate::forms::actions::VoterActions;
use crate::forms::optimistic::{Action, Optimistic, Ticket};
use crate::forms::qr;

pub const SCAN_ERROR: &str = "Hubo un error al escanear tu cédula, intenta manualmente";

static FORM_MESSAGES: &[(&str, &str)] = &[
    ("name", "El nombre es requerido"),
    ("lastName", "El apellido es requerido"),
    ("nationalId", "La cédula es requerida"),
    ("school", "La escuela es requerida"),
    ("township", "El corregimiento es requerido"),
    ("desk", "El Nº de mesa es requerida"),
];

#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Leader the new voter belongs to when the form is opened from a leader page.
    pub leader_id: Option<String>,
    /// Polling-station mode: voters without a leader go to the `noExist` leader.
    pub voter_vote: bool,
    pub back_path: String,
}

/// Values scanned from an id card, used until the user types over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub national_id: String,
    pub name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A mutation is already in flight.
    Ignored,
    /// Client-side validation failed; see `errors()`.
    Invalid,
    Succeeded {
        action: Action,
        notice: String,
        redirect: Option<String>,
        voter: Voter,
    },
    /// The modal re-opens with `values`.
    Failed {
        action: Action,
        notice: String,
        error: String,
        values: Voter,
    },
}

/// A mutation that has been applied optimistically and awaits its result.
#[derive(Debug)]
pub struct Submission {
    action: Action,
    ticket: Ticket,
    values: Voter,
    params: Option<NewVoterParams>,
}

#[derive(Debug)]
pub struct VoterForm {
    voter: Option<Voter>,
    options: FormOptions,
    prefill: Prefill,
    errors: BTreeMap<String, Vec<String>>,
    qr_error: Option<String>,
    qr_mode: bool,
    pending: bool,
}

impl VoterForm {
    pub fn new(voter: Option<Voter>, options: FormOptions) -> Self {
        Self {
            voter,
            options,
            prefill: Prefill::default(),
            errors: BTreeMap::new(),
            qr_error: None,
            qr_mode: false,
            pending: false,
        }
    }

    pub fn editing(&self) -> bool {
        self.voter.is_some()
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn qr_error(&self) -> Option<&str> {
        self.qr_error.as_deref()
    }

    pub fn qr_mode(&self) -> bool {
        self.qr_mode
    }

    pub fn prefill(&self) -> &Prefill {
        &self.prefill
    }

    pub fn open_scanner(&mut self) {
        self.qr_mode = true;
    }

    /// Fills national id, name and last name from a scanned card. A payload
    /// with the wrong shape only sets the scan error.
    pub fn handle_qr_scan(&mut self, text: &str) {
        match qr::decode(text) {
            Ok(scanned) => {
                self.qr_mode = false;
                self.qr_error = None;
                self.prefill = Prefill {
                    national_id: scanned.national_id,
                    name: scanned.name,
                    last_name: scanned.last_name,
                };
            }
            Err(e) => {
                log::warn!("unreadable id card: {}", e);
                self.qr_error = Some(SCAN_ERROR.into());
            }
        }
    }

    /// Initial value shown in an input: the edited voter, then the scan, then empty.
    pub fn default_value(&self, field: &str) -> String {
        let from_voter = self.voter.as_ref().map(|v| match field {
            "name" => v.name.clone(),
            "lastName" => v.last_name.clone(),
            "nationalId" => v.national_id.clone(),
            "school" => v.school.clone(),
            "township" => v.township.clone(),
            "desk" => v.desk.clone(),
            "leaderId" => v.leader_id.to_string(),
            _ => String::new(),
        });
        let from_scan = match field {
            "name" => self.prefill.name.clone(),
            "lastName" => self.prefill.last_name.clone(),
            "nationalId" => self.prefill.national_id.clone(),
            _ => String::new(),
        };
        from_voter.filter(|v| !v.is_empty()).unwrap_or(from_scan)
    }

    fn raw(&self, data: &BTreeMap<String, String>) -> NewVoterParams {
        let leader_id = if self.options.voter_vote {
            Some(self.options.leader_id.clone().unwrap_or_else(|| SENTINEL_NATIONAL_ID.into()))
        } else {
            self.options.leader_id.clone()
        };
        let field = |key: &str| data.get(key).cloned().map(Input::from);
        NewVoterParams {
            name: field("name"),
            last_name: field("lastName"),
            national_id: field("nationalId"),
            school: field("school"),
            township: field("township"),
            desk: field("desk"),
            leader_id: field("leaderId").or(leader_id.map(Input::from)),
        }
    }

    fn pending_voter(&self, values: &Create) -> Voter {
        let now = Utc::now();
        Voter {
            id: self.voter.as_ref().map(|v| v.id).unwrap_or_else(Uuid::nil),
            name: values.name.clone(),
            last_name: values.last_name.clone(),
            national_id: values.national_id.clone(),
            school: values.school.clone(),
            township: values.township.clone(),
            desk: values.desk.clone(),
            leader_id: match values.leader_id {
                LeaderRef::Leader(id) => id,
                LeaderRef::Unassigned => Uuid::nil(),
            },
            created_at: self.voter.as_ref().map(|v| v.created_at).unwrap_or(now),
            updated_at: self.voter.as_ref().map(|v| v.updated_at).unwrap_or(now),
        }
    }

    /// Validates the submitted form data and applies it optimistically.
    pub fn begin_submit(&mut self, data: &BTreeMap<String, String>, list: &mut Optimistic<Voter>) -> Result<Submission, Outcome> {
        if self.pending {
            return Err(Outcome::Ignored);
        }
        self.errors.clear();
        let raw = self.raw(data);
        let values = match Create::safe_parse_with(raw.clone(), FORM_MESSAGES) {
            Ok(values) => values,
            Err(issues) => {
                self.errors = flatten(&issues);
                return Err(Outcome::Invalid);
            }
        };
        let action = if self.editing() { Action::Update } else { Action::Create };
        let pending = self.pending_voter(&values);
        let ticket = list.apply(action, pending.clone());
        self.pending = true;
        Ok(Submission {
            action,
            ticket,
            values: pending,
            params: Some(raw),
        })
    }

    pub fn begin_delete(&mut self, list: &mut Optimistic<Voter>) -> Result<Submission, Outcome> {
        if self.pending {
            return Err(Outcome::Ignored);
        }
        let voter = match &self.voter {
            Some(voter) => voter.clone(),
            None => return Err(Outcome::Ignored),
        };
        let ticket = list.apply(Action::Delete, voter.clone());
        self.pending = true;
        Ok(Submission {
            action: Action::Delete,
            ticket,
            values: voter,
            params: None,
        })
    }

    /// Sends a begun submission through `actions`.
    pub async fn execute<A: VoterActions>(&self, submission: &Submission, actions: &A) -> Result<Voter, String> {
        match (submission.action, &submission.params) {
            (Action::Create, Some(params)) => actions.create_voter(params.clone()).await,
            (Action::Update, Some(params)) => actions.update_voter(submission.values.id, UpdateVoterParams::from(params.clone())).await,
            (Action::Delete, _) => actions.delete_voter(submission.values.id).await,
            _ => Err("nothing to submit".into()),
        }
    }

    /// Commits or rolls back the optimistic change once the mutation settles.
    pub fn settle(&mut self, submission: Submission, result: Result<Voter, String>, list: &mut Optimistic<Voter>) -> Outcome {
        self.pending = false;
        let verb = submission.action.verb();
        match result {
            Ok(voter) => {
                list.commit(submission.ticket, Some(voter.clone()));
                let redirect = if submission.action == Action::Delete {
                    Some(self.options.back_path.clone())
                } else if self.options.voter_vote {
                    Some(format!("/voter/{}", voter.national_id))
                } else {
                    None
                };
                Outcome::Succeeded {
                    action: submission.action,
                    notice: format!("Voter {}d!", verb),
                    redirect,
                    voter,
                }
            }
            Err(error) => {
                list.rollback(submission.ticket);
                Outcome::Failed {
                    action: submission.action,
                    notice: format!("Failed to {}", verb),
                    error,
                    values: submission.values,
                }
            }
        }
    }

    pub async fn submit<A: VoterActions>(&mut self, data: &BTreeMap<String, String>, list: &mut Optimistic<Voter>, actions: &A) -> Outcome {
        let submission = match self.begin_submit(data, list) {
            Ok(submission) => submission,
            Err(outcome) => return outcome,
        };
        let result = self.execute(&submission, actions).await;
        self.settle(submission, result, list)
    }

    pub async fn delete<A: VoterActions>(&mut self, list: &mut Optimistic<Voter>, actions: &A) -> Outcome {
        let submission = match self.begin_delete(list) {
            Ok(submission) => submission,
            Err(outcome) => return outcome,
        };
        let result = self.execute(&submission, actions).await;
        self.settle(submission, result, list)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ports::repository::Manager;
    use crate::core::services::leader;
    use crate::database::memory::MemoryManager;
    use crate::forms::actions::MutationActions;

    struct Failing;

    impl VoterActions for Failing {
        async fn create_voter(&self, _: NewVoterParams) -> Result<Voter, String> {
            Err("database is down".into())
        }

        async fn update_voter(&self, _: Uuid, _: UpdateVoterParams) -> Result<Voter, String> {
            Err("database is down".into())
        }

        async fn delete_voter(&self, _: Uuid) -> Result<Voter, String> {
            Err("database is down".into())
        }
    }

    async fn actions() -> (MutationActions<MemoryManager>, Uuid) {
        let manager = MemoryManager::with_sentinel();
        let mut store = manager.store().await.unwrap();
        let default_leader = leader::resolve_default_leader(&mut store, None).await.unwrap();
        (MutationActions::new(manager, default_leader), default_leader.id())
    }

    fn form_data() -> BTreeMap<String, String> {
        [("name", "Ana"), ("lastName", "Diaz"), ("nationalId", "8-123"), ("school", "S1"), ("township", "T1"), ("desk", "5")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    fn vote_mode() -> FormOptions {
        FormOptions {
            voter_vote: true,
            back_path: "/voters".into(),
            ..Default::default()
        }
    }

    fn scan(fields: usize) -> String {
        let mut parts = vec!["8-765-4321".to_owned(), "LUCIA".to_owned(), "PEREZ".to_owned()];
        parts.extend((3..fields).map(|i| i.to_string()));
        parts.truncate(fields);
        parts.join("|")
    }

    #[test]
    fn test_scan_prefills_identity() {
        let mut form = VoterForm::new(None, vote_mode());
        form.open_scanner();
        form.handle_qr_scan(&scan(17));
        assert!(!form.qr_mode());
        assert_eq!(form.qr_error(), None);
        assert_eq!(form.default_value("nationalId"), "8-765-4321");
        assert_eq!(form.default_value("name"), "LUCIA");
        assert_eq!(form.default_value("lastName"), "PEREZ");
    }

    #[test]
    fn test_bad_scan_leaves_fields_alone() {
        let mut form = VoterForm::new(None, vote_mode());
        form.handle_qr_scan(&scan(17));
        let before = form.prefill().clone();
        form.open_scanner();
        form.handle_qr_scan(&scan(16));
        assert_eq!(form.qr_error(), Some(SCAN_ERROR));
        assert_eq!(form.prefill(), &before);
        assert!(form.qr_mode());
    }

    #[test]
    fn test_invalid_form_uses_form_messages() {
        let mut form = VoterForm::new(None, vote_mode());
        let mut list = Optimistic::new(vec![]);
        let mut data = form_data();
        data.insert("name".into(), "".into());
        assert_eq!(form.begin_submit(&data, &mut list).unwrap_err(), Outcome::Invalid);
        assert_eq!(form.errors()["name"], vec!["El nombre es requerido".to_owned()]);
        assert!(!form.pending());
        assert!(list.view().is_empty());
    }

    #[test]
    fn test_resubmit_while_pending_is_ignored() {
        let mut form = VoterForm::new(None, vote_mode());
        let mut list = Optimistic::new(vec![]);
        let submission = form.begin_submit(&form_data(), &mut list).unwrap();
        assert!(form.pending());
        assert_eq!(list.view().len(), 1);
        assert_eq!(form.begin_submit(&form_data(), &mut list).unwrap_err(), Outcome::Ignored);
        assert_eq!(list.view().len(), 1);
        form.settle(submission, Err("boom".into()), &mut list);
        assert!(!form.pending());
    }

    #[actix_web::test]
    async fn test_vote_mode_submit_goes_to_default_leader() {
        let (actions, default_leader) = actions().await;
        let mut form = VoterForm::new(None, vote_mode());
        let mut list = Optimistic::new(vec![]);
        match form.submit(&form_data(), &mut list, &actions).await {
            Outcome::Succeeded { action, notice, redirect, voter } => {
                assert_eq!(action, Action::Create);
                assert_eq!(notice, "Voter created!");
                assert_eq!(redirect.as_deref(), Some("/voter/8-123"));
                assert_eq!(voter.leader_id, default_leader);
                assert_eq!(list.view(), vec![voter]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_failed_submit_rolls_back() {
        let mut form = VoterForm::new(None, vote_mode());
        let mut list = Optimistic::new(vec![]);
        let submission = form.begin_submit(&form_data(), &mut list).unwrap();
        let ticket = submission.ticket;
        let result = form.execute(&submission, &Failing).await;
        match form.settle(submission, result, &mut list) {
            Outcome::Failed { notice, error, values, .. } => {
                assert_eq!(notice, "Failed to create");
                assert_eq!(error, "database is down");
                assert_eq!(values.name, "Ana");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!list.is_pending(ticket));
        assert!(list.view().is_empty());
    }

    #[actix_web::test]
    async fn test_edit_then_delete() {
        let (actions, _) = actions().await;
        let mut list = Optimistic::new(vec![]);
        let created = match VoterForm::new(None, vote_mode()).submit(&form_data(), &mut list, &actions).await {
            Outcome::Succeeded { voter, .. } => voter,
            other => panic!("unexpected {:?}", other),
        };

        let mut form = VoterForm::new(Some(created.clone()), vote_mode());
        assert_eq!(form.default_value("school"), "S1");
        let mut data = form_data();
        data.insert("desk".into(), "12".into());
        match form.submit(&data, &mut list, &actions).await {
            Outcome::Succeeded { action, voter, .. } => {
                assert_eq!(action, Action::Update);
                assert_eq!(voter.id, created.id);
                assert_eq!(voter.desk, "12");
            }
            other => panic!("unexpected {:?}", other),
        }

        match form.delete(&mut list, &actions).await {
            Outcome::Succeeded { action, redirect, .. } => {
                assert_eq!(action, Action::Delete);
                assert_eq!(redirect.as_deref(), Some("/voters"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(list.view().is_empty());
    }
}
