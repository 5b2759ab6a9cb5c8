use uuid::Uuid;

use crate::core::models::common::Mutation;
use crate::core::models::leader::{DefaultLeader, Insert, Leader, LeaderWithVoters, NewLeaderParams, Patch, Query, UpdateLeaderParams, SENTINEL_NATIONAL_ID};
use crate::core::models::voter::Query as VoterQuery;
use crate::core::ports::repository::{LeaderCommon, Store, VoterCommon};
use crate::core::schema::{both, Id, IdParams, Schema};
use crate::core::services::reported;
use crate::error::Error;

/// Lists leaders; the sentinel is left out unless `include_sentinel` is set.
pub async fn find_many<S>(store: &mut S, include_sentinel: bool) -> Result<Vec<Leader>, Error>
where
    S: Store,
{
    let query = if include_sentinel {
        Query::default()
    } else {
        Query {
            national_id_ne: Some(SENTINEL_NATIONAL_ID.into()),
            ..default::default()
        }
    };
    LeaderCommon::query(store, &query).await
}

pub async fn find_by_id<S>(store: &mut S, id: IdParams) -> Result<Option<Leader>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    LeaderCommon::get(store, id).await
}

pub async fn find_by_national_id<S>(store: &mut S, national_id: &str) -> Result<Option<Leader>, Error>
where
    S: Store,
{
    let leaders = LeaderCommon::query(
        store,
        &Query {
            national_id_eq: Some(national_id.to_owned()),
            ..default::default()
        },
    )
    .await?;
    Ok(leaders.into_iter().next())
}

pub async fn find_by_id_with_voters<S>(store: &mut S, id: IdParams) -> Result<Option<LeaderWithVoters>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    let leader = match LeaderCommon::get(store, id).await? {
        Some(leader) => leader,
        None => return Ok(None),
    };
    let voters = VoterCommon::query(
        store,
        &VoterQuery {
            leader_id_eq: Some(leader.id),
            ..default::default()
        },
    )
    .await?;
    Ok(Some(LeaderWithVoters { leader, voters }))
}

/// Resolves the leader that owns voters submitted with the `noExist` marker.
///
/// A configured id must name an existing leader. Without one, the leader whose
/// national id is `noExist` is used; `nationalId` is unique, so at most one matches.
pub async fn resolve_default_leader<S>(store: &mut S, configured: Option<Uuid>) -> Result<DefaultLeader, Error>
where
    S: Store,
{
    if let Some(id) = configured {
        return match LeaderCommon::get(store, id).await? {
            Some(leader) => Ok(DefaultLeader::new(leader.id)),
            None => Err(Error::ConfigError(format!("default leader does not exist(id: {})", id))),
        };
    }
    match find_by_national_id(store, SENTINEL_NATIONAL_ID).await? {
        Some(leader) => Ok(DefaultLeader::new(leader.id)),
        None => Err(Error::StoreError(format!("no leader with nationalId {} found", SENTINEL_NATIONAL_ID))),
    }
}

pub async fn create<S>(store: &mut S, params: NewLeaderParams) -> Result<Mutation<Leader>, Error>
where
    S: Store,
{
    let insert = Insert::parse(params)?;
    let leader = reported(LeaderCommon::insert(store, insert).await)?;
    Ok(Mutation::new(leader))
}

pub async fn update<S>(store: &mut S, id: IdParams, params: UpdateLeaderParams) -> Result<Mutation<Leader>, Error>
where
    S: Store,
{
    let (Id(id), patch) = both(Id::safe_parse(id), Patch::safe_parse(params))?;
    let leader = reported(LeaderCommon::update(store, id, patch).await)?;
    Ok(Mutation::new(leader))
}

pub async fn delete<S>(store: &mut S, id: IdParams) -> Result<Mutation<Leader>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    let leader = reported(LeaderCommon::delete(store, id).await)?;
    Ok(Mutation::new(leader))
}
