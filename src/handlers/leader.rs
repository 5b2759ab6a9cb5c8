use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;
use serde::Deserialize;

use crate::core::models::common::Mutation;
use crate::core::models::leader::{Leader, NewLeaderParams, UpdateLeaderParams};
use crate::core::ports::repository::Manager;
use crate::core::schema::IdParams;
use crate::core::services::leader;
use crate::error::Error;
use crate::handlers::not_found;
use crate::response::{Item, List};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    include_sentinel: bool,
}

pub async fn list<M: Manager>(Query(ListParams { include_sentinel }): Query<ListParams>, manager: Data<M>) -> Result<Json<List<Leader>>, Error> {
    let mut store = manager.store().await?;
    let leaders = leader::find_many(&mut store, include_sentinel).await?;
    Ok(Json(List::from(leaders)))
}

pub async fn detail<M: Manager>(id: Path<(String,)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (id,) = id.into_inner();
    let mut store = manager.store().await?;
    match leader::find_by_id_with_voters(&mut store, IdParams::from(id)).await? {
        Some(found) => Ok(HttpResponse::Ok().json(Item::new(found))),
        None => Ok(not_found()),
    }
}

pub async fn create<M: Manager>(manager: Data<M>, Json(params): Json<NewLeaderParams>) -> Result<HttpResponse, Error> {
    let mut store = manager.store().await?;
    let created = leader::create(&mut store, params).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update<M: Manager>(manager: Data<M>, Query(id): Query<IdParams>, Json(params): Json<UpdateLeaderParams>) -> Result<Json<Mutation<Leader>>, Error> {
    let mut store = manager.store().await?;
    let updated = leader::update(&mut store, id, params).await?;
    Ok(Json(updated))
}

pub async fn delete_leader<M: Manager>(manager: Data<M>, Query(id): Query<IdParams>) -> Result<Json<Mutation<Leader>>, Error> {
    let mut store = manager.store().await?;
    let deleted = leader::delete(&mut store, id).await?;
    Ok(Json(deleted))
}
