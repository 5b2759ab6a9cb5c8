use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::core::models::common::Mutation;
use crate::core::models::user::{NewUserParams, Query as UserQuery, UpdateUserParams, User};
use crate::core::ports::repository::Manager;
use crate::core::schema::IdParams;
use crate::core::services::user;
use crate::error::Error;
use crate::handlers::not_found;
use crate::response::{Item, List};

pub async fn list<M: Manager>(manager: Data<M>) -> Result<Json<List<User>>, Error> {
    let mut store = manager.store().await?;
    let users = user::find_many(&mut store, UserQuery::default()).await?;
    Ok(Json(List::from(users)))
}

pub async fn detail<M: Manager>(id: Path<(String,)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (id,) = id.into_inner();
    let mut store = manager.store().await?;
    match user::find_by_id(&mut store, IdParams::from(id)).await? {
        Some(found) => Ok(HttpResponse::Ok().json(Item::new(found))),
        None => Ok(not_found()),
    }
}

pub async fn create<M: Manager>(manager: Data<M>, Json(params): Json<NewUserParams>) -> Result<HttpResponse, Error> {
    let mut store = manager.store().await?;
    let created = user::create(&mut store, params).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update<M: Manager>(manager: Data<M>, Query(id): Query<IdParams>, Json(params): Json<UpdateUserParams>) -> Result<Json<Mutation<User>>, Error> {
    let mut store = manager.store().await?;
    let updated = user::update(&mut store, id, params).await?;
    Ok(Json(updated))
}

pub async fn delete_user<M: Manager>(manager: Data<M>, Query(id): Query<IdParams>) -> Result<Json<Mutation<User>>, Error> {
    let mut store = manager.store().await?;
    let deleted = user::delete(&mut store, id).await?;
    Ok(Json(deleted))
}
