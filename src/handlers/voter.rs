use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;
use serde::Deserialize;

use crate::core::models::common::Mutation;
use crate::core::models::leader::DefaultLeader;
use crate::core::models::voter::{NewVoterParams, UpdateVoterParams, Voter};
use crate::core::ports::repository::Manager;
use crate::core::schema::{Id, IdParams, Schema};
use crate::core::services::voter;
use crate::error::Error;
use crate::handlers::not_found;
use crate::response::{Item, List};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    leader_id: Option<String>,
}

pub async fn list<M: Manager>(Query(ListParams { leader_id }): Query<ListParams>, manager: Data<M>) -> Result<Json<List<Voter>>, Error> {
    let leader_id = match leader_id {
        Some(id) => Some(Id::parse(IdParams::from(id))?.0),
        None => None,
    };
    let mut store = manager.store().await?;
    let voters = voter::find_many(&mut store, leader_id).await?;
    Ok(Json(List::from(voters)))
}

pub async fn detail<M: Manager>(id: Path<(String,)>, manager: Data<M>) -> Result<HttpResponse, Error> {
    let (id,) = id.into_inner();
    let mut store = manager.store().await?;
    match voter::find_by_id_with_leader(&mut store, IdParams::from(id)).await? {
        Some(found) => Ok(HttpResponse::Ok().json(Item::new(found))),
        None => Ok(not_found()),
    }
}

pub async fn create<M: Manager>(manager: Data<M>, default_leader: Data<DefaultLeader>, Json(params): Json<NewVoterParams>) -> Result<HttpResponse, Error> {
    let mut store = manager.store().await?;
    let created = voter::create(&mut store, &default_leader, params).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update<M: Manager>(
    manager: Data<M>,
    default_leader: Data<DefaultLeader>,
    Query(id): Query<IdParams>,
    Json(params): Json<UpdateVoterParams>,
) -> Result<Json<Mutation<Voter>>, Error> {
    let mut store = manager.store().await?;
    let updated = voter::update(&mut store, &default_leader, id, params).await?;
    Ok(Json(updated))
}

pub async fn delete_voter<M: Manager>(manager: Data<M>, Query(id): Query<IdParams>) -> Result<Json<Mutation<Voter>>, Error> {
    let mut store = manager.store().await?;
    let deleted = voter::delete(&mut store, id).await?;
    Ok(Json(deleted))
}
