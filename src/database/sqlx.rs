use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{query_as, Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::models::{
    leader::{Insert as LeaderInsert, Leader, Patch as LeaderPatch, Query as LeaderQuery},
    user::{Insert as UserInsert, Patch as UserPatch, Query as UserQuery, User},
    voter::{Insert as VoterInsert, Patch as VoterPatch, Query as VoterQuery, Voter},
};
use crate::core::ports::repository::{Common, LeaderCommon, Manager, Store, UserCommon, VoterCommon};
use crate::error::Error;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

fn found<T>(row: Option<T>, id: Uuid) -> Result<T, Error> {
    row.ok_or_else(|| Error::NotFound(id.to_string()))
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: UserInsert) -> Result<User, Error> {
        let now = Utc::now();
        let user = query_as("INSERT INTO users (id, name, email, created_at, updated_at) VALUES ($1, $2, $3, $4, $4) RETURNING *")
            .bind(Uuid::new_v4())
            .bind(data.name)
            .bind(data.email)
            .bind(now)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(user)
    }

    async fn query(&mut self, query: &UserQuery) -> Result<Vec<User>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM users WHERE 1 = 1");
        if let Some(email) = &query.email_eq {
            stmt.push(" AND email = ").push_bind(email.clone());
        }
        stmt.push(" ORDER BY created_at");
        let users = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(users)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn update(&mut self, id: Uuid, patch: UserPatch) -> Result<User, Error> {
        let user = query_as(
            "
        UPDATE users
        SET name = COALESCE($1, name),
            email = COALESCE($2, email),
            updated_at = $3
        WHERE id = $4
        RETURNING *",
        )
        .bind(patch.name)
        .bind(patch.email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        found(user, id)
    }

    async fn delete(&mut self, id: Uuid) -> Result<User, Error> {
        let user = query_as("DELETE FROM users WHERE id = $1 RETURNING *").bind(id).fetch_optional(&mut self.executor).await?;
        found(user, id)
    }
}

impl<E> LeaderCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: LeaderInsert) -> Result<Leader, Error> {
        let now = Utc::now();
        let leader = query_as(
            "INSERT INTO leaders (id, name, last_name, national_id, phone, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.last_name)
        .bind(data.national_id)
        .bind(data.phone)
        .bind(now)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(leader)
    }

    async fn query(&mut self, query: &LeaderQuery) -> Result<Vec<Leader>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM leaders WHERE 1 = 1");
        if let Some(national_id) = &query.national_id_eq {
            stmt.push(" AND national_id = ").push_bind(national_id.clone());
        }
        if let Some(national_id) = &query.national_id_ne {
            stmt.push(" AND national_id <> ").push_bind(national_id.clone());
        }
        stmt.push(" ORDER BY created_at");
        let leaders = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(leaders)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Leader>, Error> {
        let leader = query_as("SELECT * FROM leaders WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(leader)
    }

    async fn update(&mut self, id: Uuid, patch: LeaderPatch) -> Result<Leader, Error> {
        let leader = query_as(
            "
        UPDATE leaders
        SET name = COALESCE($1, name),
            last_name = COALESCE($2, last_name),
            national_id = COALESCE($3, national_id),
            phone = CASE WHEN $4 THEN $5 ELSE phone END,
            updated_at = $6
        WHERE id = $7
        RETURNING *",
        )
        .bind(patch.name)
        .bind(patch.last_name)
        .bind(patch.national_id)
        .bind(patch.phone.is_some())
        .bind(patch.phone.flatten())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        found(leader, id)
    }

    async fn delete(&mut self, id: Uuid) -> Result<Leader, Error> {
        let leader = query_as("DELETE FROM leaders WHERE id = $1 RETURNING *").bind(id).fetch_optional(&mut self.executor).await?;
        found(leader, id)
    }
}

impl<E> VoterCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: VoterInsert) -> Result<Voter, Error> {
        let now = Utc::now();
        let voter = query_as(
            "
        INSERT INTO voters (id, name, last_name, national_id, school, township, desk, leader_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.last_name)
        .bind(data.national_id)
        .bind(data.school)
        .bind(data.township)
        .bind(data.desk)
        .bind(data.leader_id)
        .bind(now)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(voter)
    }

    async fn query(&mut self, query: &VoterQuery) -> Result<Vec<Voter>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM voters WHERE 1 = 1");
        if let Some(leader_id) = query.leader_id_eq {
            stmt.push(" AND leader_id = ").push_bind(leader_id);
        }
        if let Some(national_id) = &query.national_id_eq {
            stmt.push(" AND national_id = ").push_bind(national_id.clone());
        }
        stmt.push(" ORDER BY created_at");
        let voters = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(voters)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Voter>, Error> {
        let voter = query_as("SELECT * FROM voters WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(voter)
    }

    async fn update(&mut self, id: Uuid, patch: VoterPatch) -> Result<Voter, Error> {
        let voter = query_as(
            "
        UPDATE voters
        SET name = COALESCE($1, name),
            last_name = COALESCE($2, last_name),
            national_id = COALESCE($3, national_id),
            school = COALESCE($4, school),
            township = COALESCE($5, township),
            desk = COALESCE($6, desk),
            leader_id = COALESCE($7, leader_id),
            updated_at = $8
        WHERE id = $9
        RETURNING *",
        )
        .bind(patch.name)
        .bind(patch.last_name)
        .bind(patch.national_id)
        .bind(patch.school)
        .bind(patch.township)
        .bind(patch.desk)
        .bind(patch.leader_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        found(voter, id)
    }

    async fn delete(&mut self, id: Uuid) -> Result<Voter, Error> {
        let voter = query_as("DELETE FROM voters WHERE id = $1 RETURNING *").bind(id).fetch_optional(&mut self.executor).await?;
        found(voter, id)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}

#[derive(Debug, Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;

    async fn store(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }
}
