use uuid::Uuid;

use crate::core::models::common::Mutation;
use crate::core::models::leader::DefaultLeader;
use crate::core::models::voter::{Create, NewVoterParams, Query, Update, UpdateVoterParams, Voter, VoterWithLeader};
use crate::core::ports::repository::{LeaderCommon, Store, VoterCommon};
use crate::core::schema::{both, Id, IdParams, Schema};
use crate::core::services::reported;
use crate::error::Error;

pub async fn find_by_id<S>(store: &mut S, id: IdParams) -> Result<Option<Voter>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    VoterCommon::get(store, id).await
}

pub async fn find_many<S>(store: &mut S, leader_id: Option<Uuid>) -> Result<Vec<Voter>, Error>
where
    S: Store,
{
    VoterCommon::query(
        store,
        &Query {
            leader_id_eq: leader_id,
            ..default::default()
        },
    )
    .await
}

pub async fn find_by_national_id<S>(store: &mut S, national_id: &str) -> Result<Option<Voter>, Error>
where
    S: Store,
{
    let voters = VoterCommon::query(
        store,
        &Query {
            national_id_eq: Some(national_id.to_owned()),
            ..default::default()
        },
    )
    .await?;
    Ok(voters.into_iter().next())
}

pub async fn find_by_id_with_leader<S>(store: &mut S, id: IdParams) -> Result<Option<VoterWithLeader>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    let voter = match VoterCommon::get(store, id).await? {
        Some(voter) => voter,
        None => return Ok(None),
    };
    let leader = LeaderCommon::get(store, voter.leader_id).await?;
    Ok(Some(VoterWithLeader { voter, leader }))
}

/// Creates a voter. A `noExist` owner is rebound to `default_leader` before the insert.
pub async fn create<S>(store: &mut S, default_leader: &DefaultLeader, params: NewVoterParams) -> Result<Mutation<Voter>, Error>
where
    S: Store,
{
    let insert = Create::parse(params)?.resolve(default_leader);
    let voter = reported(VoterCommon::insert(store, insert).await)?;
    Ok(Mutation::new(voter))
}

pub async fn update<S>(store: &mut S, default_leader: &DefaultLeader, id: IdParams, params: UpdateVoterParams) -> Result<Mutation<Voter>, Error>
where
    S: Store,
{
    let (Id(id), update) = both(Id::safe_parse(id), Update::safe_parse(params))?;
    let voter = reported(VoterCommon::update(store, id, update.resolve(default_leader)).await)?;
    Ok(Mutation::new(voter))
}

pub async fn delete<S>(store: &mut S, id: IdParams) -> Result<Mutation<Voter>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    let voter = reported(VoterCommon::delete(store, id).await)?;
    Ok(Mutation::new(voter))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::leader::NewLeaderParams;
    use crate::core::ports::repository::Manager;
    use crate::core::services::leader;
    use crate::database::memory::{MemoryManager, MemoryStore};

    async fn setup() -> (MemoryManager, MemoryStore, DefaultLeader) {
        let manager = MemoryManager::with_sentinel();
        let mut store = manager.store().await.unwrap();
        let default_leader = leader::resolve_default_leader(&mut store, None).await.unwrap();
        (manager, store, default_leader)
    }

    fn params(leader_id: &str) -> NewVoterParams {
        NewVoterParams {
            name: Some("Ana".into()),
            last_name: Some("Diaz".into()),
            national_id: Some("8-123".into()),
            school: Some("S1".into()),
            township: Some("T1".into()),
            desk: Some("5".into()),
            leader_id: Some(leader_id.into()),
        }
    }

    #[actix_web::test]
    async fn test_create_then_find_by_id() {
        let (_, mut store, default_leader) = setup().await;
        let created = create(&mut store, &default_leader, params("noExist")).await.unwrap();
        assert!(created.success);
        let found = find_by_id(&mut store, created.data.id.into()).await.unwrap().unwrap();
        assert_eq!(found.name, "Ana");
        assert_eq!(found.last_name, "Diaz");
        assert_eq!(found.national_id, "8-123");
        assert_eq!(found.school, "S1");
        assert_eq!(found.township, "T1");
        assert_eq!(found.desk, "5");
        assert!(!found.id.is_nil());
        assert!(found.updated_at >= found.created_at);
    }

    #[actix_web::test]
    async fn test_padded_values_round_trip() {
        let (_, mut store, default_leader) = setup().await;
        let mut raw = params("noExist");
        raw.name = Some(" Ana ".into());
        raw.national_id = Some("8-123 ".into());
        let created = create(&mut store, &default_leader, raw).await.unwrap().data;
        let found = find_by_id(&mut store, created.id.into()).await.unwrap().unwrap();
        assert_eq!(found.name, " Ana ");
        assert_eq!(found.national_id, "8-123 ");
        assert_eq!(found, created);
    }

    #[actix_web::test]
    async fn test_marker_is_never_persisted() {
        let (_, mut store, default_leader) = setup().await;
        let sentinel = leader::find_by_national_id(&mut store, "noExist").await.unwrap().unwrap();
        let created = create(&mut store, &default_leader, params("noExist")).await.unwrap();
        assert_eq!(created.data.leader_id, sentinel.id);

        let with_leader = find_by_id_with_leader(&mut store, created.data.id.into()).await.unwrap().unwrap();
        assert_eq!(with_leader.leader.unwrap().id, sentinel.id);
    }

    #[actix_web::test]
    async fn test_create_with_real_leader() {
        let (_, mut store, default_leader) = setup().await;
        let owner = leader::create(
            &mut store,
            NewLeaderParams {
                name: Some("Rosa".into()),
                last_name: Some("Mena".into()),
                national_id: Some("4-4-4".into()),
                phone: None,
            },
        )
        .await
        .unwrap()
        .data;
        let created = create(&mut store, &default_leader, params(&owner.id.to_string())).await.unwrap();
        assert_eq!(created.data.leader_id, owner.id);
        assert_eq!(find_many(&mut store, Some(owner.id)).await.unwrap().len(), 1);
        assert_eq!(find_many(&mut store, Some(default_leader.id())).await.unwrap().len(), 0);

        let err = leader::delete(&mut store, owner.id.into()).await.unwrap_err();
        assert!(matches!(err, Error::StoreError(_)));
    }

    #[actix_web::test]
    async fn test_unknown_leader_is_a_store_error() {
        let (_, mut store, default_leader) = setup().await;
        let err = create(&mut store, &default_leader, params(&Uuid::new_v4().to_string())).await.unwrap_err();
        assert!(matches!(err, Error::StoreError(_)));
        assert!(find_many(&mut store, None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_update_unknown_id() {
        let (_, mut store, default_leader) = setup().await;
        create(&mut store, &default_leader, params("noExist")).await.unwrap();
        let before = find_many(&mut store, None).await.unwrap();
        let err = update(
            &mut store,
            &default_leader,
            Uuid::new_v4().into(),
            UpdateVoterParams {
                desk: Some("9".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(find_many(&mut store, None).await.unwrap(), before);
    }

    #[actix_web::test]
    async fn test_update_keeps_untouched_fields() {
        let (_, mut store, default_leader) = setup().await;
        let created = create(&mut store, &default_leader, params("noExist")).await.unwrap().data;
        let updated = update(
            &mut store,
            &default_leader,
            created.id.into(),
            UpdateVoterParams {
                desk: Some("9".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;
        assert_eq!(updated.desk, "9");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[actix_web::test]
    async fn test_delete_twice() {
        let (_, mut store, default_leader) = setup().await;
        let created = create(&mut store, &default_leader, params("noExist")).await.unwrap().data;
        let deleted = delete(&mut store, created.id.into()).await.unwrap();
        assert_eq!(deleted.data, created);
        assert!(find_by_id(&mut store, created.id.into()).await.unwrap().is_none());
        let err = delete(&mut store, created.id.into()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_malformed_id_never_reaches_store() {
        let (manager, mut store, default_leader) = setup().await;
        let calls = manager.calls();
        assert!(find_by_id(&mut store, IdParams::from("abc")).await.unwrap_err().issues().is_some());
        assert!(find_by_id_with_leader(&mut store, IdParams::default()).await.unwrap_err().issues().is_some());
        assert!(delete(&mut store, IdParams::from("1")).await.unwrap_err().issues().is_some());
        assert!(update(&mut store, &default_leader, IdParams::from("x"), UpdateVoterParams::default())
            .await
            .unwrap_err()
            .issues()
            .is_some());
        assert!(leader::find_by_id(&mut store, IdParams::from("x")).await.is_err());
        assert!(leader::delete(&mut store, IdParams::from("x")).await.is_err());
        assert_eq!(manager.calls(), calls);
    }

    #[actix_web::test]
    async fn test_find_by_national_id() {
        let (_, mut store, default_leader) = setup().await;
        create(&mut store, &default_leader, params("noExist")).await.unwrap();
        assert!(find_by_national_id(&mut store, "8-123").await.unwrap().is_some());
        assert!(find_by_national_id(&mut store, "0-000").await.unwrap().is_none());
    }
}
