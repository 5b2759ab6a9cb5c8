use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::core::models::{
    leader::{Insert as LeaderInsert, Leader, Patch as LeaderPatch, Query as LeaderQuery, SENTINEL_NATIONAL_ID},
    user::{Insert as UserInsert, Patch as UserPatch, Query as UserQuery, User},
    voter::{Insert as VoterInsert, Patch as VoterPatch, Query as VoterQuery, Voter},
};
use crate::core::ports::repository::{Common, LeaderCommon, Manager, Store, UserCommon, VoterCommon};
use crate::error::Error;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    leaders: Vec<Leader>,
    voters: Vec<Voter>,
    calls: usize,
}

/// Process-local store with the same constraints as the postgres schema:
/// unique `users.email` and `leaders.national_id`, `voters.leader_id` must
/// reference a leader, and a leader that still owns voters cannot be deleted.
#[derive(Debug, Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the `noExist` leader.
    pub fn with_sentinel() -> Self {
        let manager = Self::new();
        if let Ok(mut state) = manager.state.lock() {
            let now = Utc::now();
            state.leaders.push(Leader {
                id: Uuid::new_v4(),
                name: SENTINEL_NATIONAL_ID.into(),
                last_name: SENTINEL_NATIONAL_ID.into(),
                national_id: SENTINEL_NATIONAL_ID.into(),
                phone: None,
                created_at: now,
                updated_at: now,
            });
        }
        manager
    }

    /// Number of store operations served so far.
    pub fn calls(&self) -> usize {
        self.state.lock().map(|s| s.calls).unwrap_or_default()
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;

    async fn store(&self) -> Result<MemoryStore, Error> {
        Ok(MemoryStore { state: self.state.clone() })
    }
}

pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut State) -> Result<R, Error>) -> Result<R, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StoreError("memory store lock poisoned".into()))?;
        state.calls += 1;
        f(&mut state)
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(id.to_string())
}

fn unique_violation(column: &str) -> Error {
    Error::StoreError(format!("unique constraint failed on {}", column))
}

fn foreign_key_violation(column: &str) -> Error {
    Error::StoreError(format!("foreign key constraint failed on {}", column))
}

fn position<T>(rows: &[T], id: Uuid, key: impl Fn(&T) -> Uuid) -> Result<usize, Error> {
    rows.iter().position(|r| key(r) == id).ok_or_else(|| not_found(id))
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, data: UserInsert) -> Result<User, Error> {
        self.with(|state| {
            if state.users.iter().any(|u| u.email == data.email) {
                return Err(unique_violation("users.email"));
            }
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                name: data.name,
                email: data.email,
                created_at: now,
                updated_at: now,
            };
            state.users.push(user.clone());
            Ok(user)
        })
    }

    async fn query(&mut self, query: &UserQuery) -> Result<Vec<User>, Error> {
        self.with(|state| {
            Ok(state
                .users
                .iter()
                .filter(|u| query.email_eq.as_ref().map_or(true, |e| &u.email == e))
                .cloned()
                .collect())
        })
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<User>, Error> {
        self.with(|state| Ok(state.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn update(&mut self, id: Uuid, patch: UserPatch) -> Result<User, Error> {
        self.with(|state| {
            let i = position(&state.users, id, |u| u.id)?;
            if let Some(email) = &patch.email {
                if state.users.iter().any(|u| u.id != id && &u.email == email) {
                    return Err(unique_violation("users.email"));
                }
            }
            let user = &mut state.users[i];
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(email) = patch.email {
                user.email = email;
            }
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<User, Error> {
        self.with(|state| {
            let i = position(&state.users, id, |u| u.id)?;
            Ok(state.users.remove(i))
        })
    }
}

impl LeaderCommon for MemoryStore {
    async fn insert(&mut self, data: LeaderInsert) -> Result<Leader, Error> {
        self.with(|state| {
            if state.leaders.iter().any(|l| l.national_id == data.national_id) {
                return Err(unique_violation("leaders.national_id"));
            }
            let now = Utc::now();
            let leader = Leader {
                id: Uuid::new_v4(),
                name: data.name,
                last_name: data.last_name,
                national_id: data.national_id,
                phone: data.phone,
                created_at: now,
                updated_at: now,
            };
            state.leaders.push(leader.clone());
            Ok(leader)
        })
    }

    async fn query(&mut self, query: &LeaderQuery) -> Result<Vec<Leader>, Error> {
        self.with(|state| {
            Ok(state
                .leaders
                .iter()
                .filter(|l| query.national_id_eq.as_ref().map_or(true, |n| &l.national_id == n))
                .filter(|l| query.national_id_ne.as_ref().map_or(true, |n| &l.national_id != n))
                .cloned()
                .collect())
        })
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Leader>, Error> {
        self.with(|state| Ok(state.leaders.iter().find(|l| l.id == id).cloned()))
    }

    async fn update(&mut self, id: Uuid, patch: LeaderPatch) -> Result<Leader, Error> {
        self.with(|state| {
            let i = position(&state.leaders, id, |l| l.id)?;
            if let Some(national_id) = &patch.national_id {
                if state.leaders.iter().any(|l| l.id != id && &l.national_id == national_id) {
                    return Err(unique_violation("leaders.national_id"));
                }
            }
            let leader = &mut state.leaders[i];
            if let Some(name) = patch.name {
                leader.name = name;
            }
            if let Some(last_name) = patch.last_name {
                leader.last_name = last_name;
            }
            if let Some(national_id) = patch.national_id {
                leader.national_id = national_id;
            }
            if let Some(phone) = patch.phone {
                leader.phone = phone;
            }
            leader.updated_at = Utc::now();
            Ok(leader.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<Leader, Error> {
        self.with(|state| {
            let i = position(&state.leaders, id, |l| l.id)?;
            if state.voters.iter().any(|v| v.leader_id == id) {
                return Err(foreign_key_violation("voters.leader_id"));
            }
            Ok(state.leaders.remove(i))
        })
    }
}

impl VoterCommon for MemoryStore {
    async fn insert(&mut self, data: VoterInsert) -> Result<Voter, Error> {
        self.with(|state| {
            if !state.leaders.iter().any(|l| l.id == data.leader_id) {
                return Err(foreign_key_violation("voters.leader_id"));
            }
            let now = Utc::now();
            let voter = Voter {
                id: Uuid::new_v4(),
                name: data.name,
                last_name: data.last_name,
                national_id: data.national_id,
                school: data.school,
                township: data.township,
                desk: data.desk,
                leader_id: data.leader_id,
                created_at: now,
                updated_at: now,
            };
            state.voters.push(voter.clone());
            Ok(voter)
        })
    }

    async fn query(&mut self, query: &VoterQuery) -> Result<Vec<Voter>, Error> {
        self.with(|state| {
            Ok(state
                .voters
                .iter()
                .filter(|v| query.leader_id_eq.map_or(true, |id| v.leader_id == id))
                .filter(|v| query.national_id_eq.as_ref().map_or(true, |n| &v.national_id == n))
                .cloned()
                .collect())
        })
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Voter>, Error> {
        self.with(|state| Ok(state.voters.iter().find(|v| v.id == id).cloned()))
    }

    async fn update(&mut self, id: Uuid, patch: VoterPatch) -> Result<Voter, Error> {
        self.with(|state| {
            let i = position(&state.voters, id, |v| v.id)?;
            if let Some(leader_id) = patch.leader_id {
                if !state.leaders.iter().any(|l| l.id == leader_id) {
                    return Err(foreign_key_violation("voters.leader_id"));
                }
            }
            let voter = &mut state.voters[i];
            if let Some(name) = patch.name {
                voter.name = name;
            }
            if let Some(last_name) = patch.last_name {
                voter.last_name = last_name;
            }
            if let Some(national_id) = patch.national_id {
                voter.national_id = national_id;
            }
            if let Some(school) = patch.school {
                voter.school = school;
            }
            if let Some(township) = patch.township {
                voter.township = township;
            }
            if let Some(desk) = patch.desk {
                voter.desk = desk;
            }
            if let Some(leader_id) = patch.leader_id {
                voter.leader_id = leader_id;
            }
            voter.updated_at = Utc::now();
            Ok(voter.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<Voter, Error> {
        self.with(|state| {
            let i = position(&state.voters, id, |v| v.id)?;
            Ok(state.voters.remove(i))
        })
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}
