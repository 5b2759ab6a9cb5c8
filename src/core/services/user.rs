use crate::core::models::common::Mutation;
use crate::core::models::user::{Insert, NewUserParams, Patch, Query, UpdateUserParams, User};
use crate::core::ports::repository::{Store, UserCommon};
use crate::core::schema::{both, Id, IdParams, Schema};
use crate::core::services::reported;
use crate::error::Error;

pub async fn find_by_id<S>(store: &mut S, id: IdParams) -> Result<Option<User>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    UserCommon::get(store, id).await
}

pub async fn find_many<S>(store: &mut S, query: Query) -> Result<Vec<User>, Error>
where
    S: Store,
{
    UserCommon::query(store, &query).await
}

pub async fn create<S>(store: &mut S, params: NewUserParams) -> Result<Mutation<User>, Error>
where
    S: Store,
{
    let insert = Insert::parse(params)?;
    let user = reported(UserCommon::insert(store, insert).await)?;
    Ok(Mutation::new(user))
}

pub async fn update<S>(store: &mut S, id: IdParams, params: UpdateUserParams) -> Result<Mutation<User>, Error>
where
    S: Store,
{
    let (Id(id), patch) = both(Id::safe_parse(id), Patch::safe_parse(params))?;
    let user = reported(UserCommon::update(store, id, patch).await)?;
    Ok(Mutation::new(user))
}

pub async fn delete<S>(store: &mut S, id: IdParams) -> Result<Mutation<User>, Error>
where
    S: Store,
{
    let Id(id) = Id::parse(id)?;
    let user = reported(UserCommon::delete(store, id).await)?;
    Ok(Mutation::new(user))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;

    fn params(email: &str) -> NewUserParams {
        NewUserParams {
            name: Some("Marta".into()),
            email: Some(email.into()),
        }
    }

    #[actix_web::test]
    async fn test_create_then_find() {
        let manager = MemoryManager::new();
        let mut store = manager.store().await.unwrap();
        let Mutation { data: created, success } = create(&mut store, params("marta@example.com")).await.unwrap();
        assert!(success);
        let found = find_by_id(&mut store, created.id.into()).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.email, "marta@example.com");
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_a_store_error() {
        let manager = MemoryManager::new();
        let mut store = manager.store().await.unwrap();
        create(&mut store, params("dup@example.com")).await.unwrap();
        let err = create(&mut store, params("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, Error::StoreError(_)));
        assert_eq!(find_many(&mut store, Query::default()).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_update_reports_id_and_param_issues_together() {
        let manager = MemoryManager::new();
        let mut store = manager.store().await.unwrap();
        let err = update(
            &mut store,
            IdParams::from("nope"),
            UpdateUserParams {
                email: Some("bad".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.issues().map(|i| i.len()), Some(2));
        assert_eq!(manager.calls(), 0);
    }
}
