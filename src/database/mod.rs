// region:    --- Imports
use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Database Manager
/// 데이터베이스 매니저
/// 커넥션 풀을 소유하며 프로세스 시작 시 한 번 생성되어 주입된다.
pub struct DatabaseManager {
    pub pool: Arc<PgPool>,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub async fn new(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// 트랜잭션 실행
    /// 클로저가 Ok를 반환하면 커밋, Err를 반환하면 롤백한다.
    /// 커넥션은 어떤 종료 경로에서도 풀로 반환된다.
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화
    /// 타입이 없으면 00-create-types.sql을 먼저 실행하고
    /// 이어서 01-create-schema.sql을 실행한다(IF NOT EXISTS, 데이터 보존).
    pub async fn initialize_database(&self) -> Result<(), sqlx::Error> {
        let types_exist: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'auction_status')",
        )
        .fetch_one(&*self.pool)
        .await?;

        if !types_exist {
            let create_types_sql = include_str!("../../sql/00-create-types.sql");
            self.execute_multi_query(create_types_sql).await?;
            info!("{:<12} --> 데이터베이스 타입 생성 완료", "Database");
        }

        let create_schema_sql = include_str!("../../sql/01-create-schema.sql");
        self.execute_multi_query(create_schema_sql).await?;

        Ok(())
    }

    /// 여러 쿼리 실행
    async fn execute_multi_query(&self, sql: &str) -> Result<(), sqlx::Error> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        Ok(())
    }

    /// 풀 종료(프로세스 셧다운 시 호출)
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
// endregion: --- Database Manager
