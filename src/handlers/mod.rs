pub mod leader;
pub mod user;
pub mod voter;

use actix_web::web::{delete, get, post, put, resource, scope, JsonConfig, QueryConfig, ServiceConfig};
use actix_web::HttpResponse;
use serde_json::json;

use crate::core::ports::repository::Manager;
use crate::core::schema::{Issue, IssueCode};
use crate::error::Error;

/// Malformed bodies are reported like any other schema mismatch.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _| Error::Validation(vec![Issue::new(IssueCode::InvalidType, "", err.to_string())]).into())
}

pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _| Error::Validation(vec![Issue::new(IssueCode::InvalidType, "", err.to_string())]).into())
}

pub(crate) fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "data": null }))
}

pub fn routes<M>(cfg: &mut ServiceConfig)
where
    M: Manager + 'static,
{
    cfg.service(
        scope("api")
            .service(
                resource("users")
                    .route(get().to(user::list::<M>))
                    .route(post().to(user::create::<M>))
                    .route(put().to(user::update::<M>))
                    .route(delete().to(user::delete_user::<M>)),
            )
            .service(resource("users/{id}").route(get().to(user::detail::<M>)))
            .service(
                resource("leaders")
                    .route(get().to(leader::list::<M>))
                    .route(post().to(leader::create::<M>))
                    .route(put().to(leader::update::<M>))
                    .route(delete().to(leader::delete_leader::<M>)),
            )
            .service(resource("leaders/{id}").route(get().to(leader::detail::<M>)))
            .service(
                resource("voters")
                    .route(get().to(voter::list::<M>))
                    .route(post().to(voter::create::<M>))
                    .route(put().to(voter::update::<M>))
                    .route(delete().to(voter::delete_voter::<M>)),
            )
            .service(resource("voters/{id}").route(get().to(voter::detail::<M>))),
    );
}
