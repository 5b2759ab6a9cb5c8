use uuid::Uuid;

use crate::core::models::leader::DefaultLeader;
use crate::core::models::voter::{NewVoterParams, UpdateVoterParams, Voter};
use crate::core::ports::repository::Manager;
use crate::core::services::voter;

/// What a form calls to persist a voter. Failures come back as a display message.
pub trait VoterActions {
    async fn create_voter(&self, params: NewVoterParams) -> Result<Voter, String>;
    async fn update_voter(&self, id: Uuid, params: UpdateVoterParams) -> Result<Voter, String>;
    async fn delete_voter(&self, id: Uuid) -> Result<Voter, String>;
}

/// Runs form actions directly against the mutation layer.
pub struct MutationActions<M> {
    manager: M,
    default_leader: DefaultLeader,
}

impl<M: Manager> MutationActions<M> {
    pub fn new(manager: M, default_leader: DefaultLeader) -> Self {
        Self { manager, default_leader }
    }
}

impl<M: Manager> VoterActions for MutationActions<M> {
    async fn create_voter(&self, params: NewVoterParams) -> Result<Voter, String> {
        let mut store = self.manager.store().await.map_err(|e| e.to_string())?;
        voter::create(&mut store, &self.default_leader, params).await.map(|m| m.data).map_err(|e| e.to_string())
    }

    async fn update_voter(&self, id: Uuid, params: UpdateVoterParams) -> Result<Voter, String> {
        let mut store = self.manager.store().await.map_err(|e| e.to_string())?;
        voter::update(&mut store, &self.default_leader, id.into(), params)
            .await
            .map(|m| m.data)
            .map_err(|e| e.to_string())
    }

    async fn delete_voter(&self, id: Uuid) -> Result<Voter, String> {
        let mut store = self.manager.store().await.map_err(|e| e.to_string())?;
        voter::delete(&mut store, id.into()).await.map(|m| m.data).map_err(|e| e.to_string())
    }
}
