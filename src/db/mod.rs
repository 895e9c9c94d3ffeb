//! MongoDB 연결 관리

use mongodb::{Client, Collection, options::ClientOptions};
use crate::config::StorageSettings;
use crate::core::errors::AppResult;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 설정된 URI로 연결하고 `ping` 명령으로 확인합니다.
    pub async fn connect(settings: &StorageSettings) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&settings.mongodb_uri).await?;

        // 애플리케이션 이름 (서버 측 모니터링용)
        client_options.app_name = Some("account_service".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&settings.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        log::info!("✅ MongoDB 연결 성공: {}", settings.database_name);

        Ok(Self {
            client,
            database_name: settings.database_name.clone(),
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.get_database().collection::<T>(name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("database_name", &self.database_name)
            .finish_non_exhaustive()
    }
}
