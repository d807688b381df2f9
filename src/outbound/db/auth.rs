use crate::domain::auth::{CredentialsRepository, WorkerCredentials};
use crate::outbound::db::error::Error;
use crate::outbound::db::models::CredentialsRow;
use crate::outbound::db::repository::Repository;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl CredentialsRepository for Repository {
    async fn find_credentials_by_username(
        &self,
        username: String,
    ) -> Result<Option<WorkerCredentials>, Error> {
        let result = sqlx::query_as::<_, CredentialsRow>(
            r#"
select
    w.id, w.username, w.password_hash
from workers w
where w.username = $1
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.into());

        Ok(result)
    }

    async fn worker_exists(&self, worker_id: Uuid) -> Result<bool, Error> {
        let exists: bool =
            sqlx::query_scalar("select exists (select 1 from workers where id = $1)")
                .bind(worker_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::password::{hash_password, verify_password};
    use crate::domain::task_manager::{CreateWorkerDBParams, DatabaseRepository};
    use sqlx::PgPool;

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_find_credentials(pool: PgPool) {
        let repo = Repository::new(pool);
        let worker = repo
            .create_worker(CreateWorkerDBParams {
                username: "alice".to_string(),
                password_hash: hash_password("pale-ocean-42").unwrap(),
                first_name: "Alice".to_string(),
                last_name: "".to_string(),
                email: "".to_string(),
                position_id: None,
            })
            .await
            .unwrap();

        let credentials = repo
            .find_credentials_by_username("alice".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(worker.id, credentials.worker_id);
        assert!(verify_password(&credentials.password_hash, "pale-ocean-42").unwrap());
        assert!(repo.worker_exists(worker.id).await.unwrap());
        assert!(!repo.worker_exists(Uuid::now_v7()).await.unwrap());
        assert!(
            repo.find_credentials_by_username("bob".to_string())
                .await
                .unwrap()
                .is_none()
        );
    }
}
