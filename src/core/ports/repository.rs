use uuid::Uuid;

use crate::core::models::{
    leader::{Insert as LeaderInsert, Leader, Patch as LeaderPatch, Query as LeaderQuery},
    user::{Insert as UserInsert, Patch as UserPatch, Query as UserQuery, User},
    voter::{Insert as VoterInsert, Patch as VoterPatch, Query as VoterQuery, Voter},
};
use crate::error::Error;

// `update` and `delete` fail with `Error::NotFound` when no row has the id.

pub trait UserCommon {
    async fn insert(&mut self, data: UserInsert) -> Result<User, Error>;
    async fn query(&mut self, query: &UserQuery) -> Result<Vec<User>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<User>, Error>;
    async fn update(&mut self, id: Uuid, patch: UserPatch) -> Result<User, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<User, Error>;
}

pub trait LeaderCommon {
    async fn insert(&mut self, data: LeaderInsert) -> Result<Leader, Error>;
    async fn query(&mut self, query: &LeaderQuery) -> Result<Vec<Leader>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Leader>, Error>;
    async fn update(&mut self, id: Uuid, patch: LeaderPatch) -> Result<Leader, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<Leader, Error>;
}

pub trait VoterCommon {
    async fn insert(&mut self, data: VoterInsert) -> Result<Voter, Error>;
    async fn query(&mut self, query: &VoterQuery) -> Result<Vec<Voter>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Voter>, Error>;
    async fn update(&mut self, id: Uuid, patch: VoterPatch) -> Result<Voter, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<Voter, Error>;
}

pub trait Common: UserCommon + LeaderCommon + VoterCommon {}

pub trait Store: Common {}

/// Hands out a store handle per request.
pub trait Manager {
    type Store: Store + 'static;

    async fn store(&self) -> Result<Self::Store, Error>;
}
