//! 계정 서비스 메인 애플리케이션
//!
//! 설정을 읽고 저장소, 메시징, 핸들러 레지스트리를 조립한 뒤 Actix-web 서버를 구동합니다.
//! 서버가 멈추면 종료 토큰을 취소해 진행 중인 요청과 확인 이메일 소비자를 정리합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;
use account_service_backend::caching::redis::RedisClient;
use account_service_backend::config::{
    AppSettings, MessagingTransport, RateLimitSettings, ServerSettings, StorageBackend,
    StorageSettings,
};
use account_service_backend::core::cancellation::RequestScopes;
use account_service_backend::core::telemetry::LogOperationLogger;
use account_service_backend::core::{AppResult, HandlerRegistry};
use account_service_backend::db::Database;
use account_service_backend::repositories::{
    AccountStore, AuditReader, AuditWriter, InMemoryAccountStore, InMemoryAuditLog,
    MongoAccountStore, MongoAuditRepository,
};
use account_service_backend::routes::configure_all_routes;
use account_service_backend::services::auth::TokenService;
use account_service_backend::services::identity::IdentityService;
use account_service_backend::services::messaging::{
    run_consumer, ConfirmationEmailConsumer, EmailScheduler, EventPublisher, EventSource,
    HttpEmailScheduler, InMemoryEventBus, LogEmailScheduler, RedisEventQueue,
};

/// 계정/감사 로그 저장소 묶음
struct DataStores {
    accounts: Arc<dyn AccountStore>,
    audit_writer: Arc<dyn AuditWriter>,
    audit_reader: Arc<dyn AuditReader>,
}

/// 같은 큐를 바라보는 발행/소비 양쪽
struct EventChannel {
    publisher: Arc<dyn EventPublisher>,
    source: Arc<dyn EventSource>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 계정 서비스 시작중...");

    let settings = AppSettings::from_env().map_err(|e| {
        error!("설정 로드 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("환경: {:?}", settings.environment);

    // Mongo 캐시와 Redis 발행은 같은 연결을 공유합니다. 소비자는 별도 연결을 씁니다.
    let mut redis: Option<Arc<RedisClient>> = None;

    let stores = initialize_data_stores(&settings.storage, &mut redis)
        .await
        .map_err(|e| {
            error!("데이터 스토어 초기화 실패: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    let events = initialize_event_channel(&settings, &mut redis)
        .await
        .map_err(|e| {
            error!("메시징 초기화 실패: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    let shutdown = CancellationToken::new();

    let scheduler: Arc<dyn EmailScheduler> = match &settings.email.service_url {
        Some(url) => {
            info!("📧 이메일 서비스: {}", url);
            Arc::new(HttpEmailScheduler::new(url.clone(), settings.email.api_key.clone()))
        }
        None => {
            warn!("EMAIL_SERVICE_URL 미설정 - 확인 이메일은 로그로만 기록됩니다");
            Arc::new(LogEmailScheduler)
        }
    };
    let consumer = Arc::new(ConfirmationEmailConsumer::new(scheduler, &settings.email));
    let consumer_task = tokio::spawn(run_consumer(
        events.source,
        consumer,
        settings.messaging.max_delivery_attempts,
        shutdown.clone(),
    ));

    let tokens = Arc::new(TokenService::new(settings.jwt.clone()));
    let identity = Arc::new(IdentityService::new(
        stores.accounts,
        stores.audit_writer,
        tokens.clone(),
        settings.password,
    ));
    let registry = HandlerRegistry::compose(
        identity,
        stores.audit_reader,
        events.publisher,
        Arc::new(LogOperationLogger),
    );
    let scopes = RequestScopes::new(shutdown.clone(), settings.server.request_timeout);

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let result = start_http_server(
        &settings.server,
        &settings.rate_limit,
        web::Data::new(registry),
        web::Data::new(scopes),
        web::Data::from(tokens),
    )
    .await;

    info!("🛑 서버 종료 - 백그라운드 작업 정리중...");
    shutdown.cancel();
    if let Err(e) = consumer_task.await {
        error!("확인 이메일 소비자 종료 실패: {}", e);
    }

    result
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 순서대로 감쌉니다.
///
/// # Errors
///
/// * `std::io::Error` - Rate Limiting 설정 오류, 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(
    server: &ServerSettings,
    rate_limit: &RateLimitSettings,
    registry: web::Data<HandlerRegistry>,
    scopes: web::Data<RequestScopes>,
    tokens: web::Data<TokenService>,
) -> std::io::Result<()> {
    let bind_address = server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API: http://{}/api/v1", bind_address);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second,
        rate_limit.burst_size
    );

    let allowed_origins = server.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(registry.clone())
            .app_data(scopes.clone())
            .app_data(tokens.clone())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(server.workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 파일이 없어도 프로세스 환경 변수만으로 계속 진행합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// # 전체 debug 모드
/// RUST_LOG=debug cargo run
///
/// # 핸들러 파이프라인만 debug
/// RUST_LOG=account_service_backend::core=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// 필요할 때만 Redis에 연결하고, 이미 연결되어 있으면 재사용합니다.
async fn shared_redis(
    redis: &mut Option<Arc<RedisClient>>,
    url: &str,
) -> AppResult<Arc<RedisClient>> {
    if let Some(client) = redis {
        return Ok(client.clone());
    }

    let client = Arc::new(RedisClient::connect(url).await?);
    *redis = Some(client.clone());
    Ok(client)
}

/// 설정된 백엔드로 계정/감사 로그 저장소를 초기화합니다
async fn initialize_data_stores(
    storage: &StorageSettings,
    redis: &mut Option<Arc<RedisClient>>,
) -> AppResult<DataStores> {
    match storage.backend {
        StorageBackend::Memory => {
            warn!("💾 메모리 저장소 사용 - 재시작 시 데이터가 사라집니다");
            let audits = Arc::new(InMemoryAuditLog::new());
            Ok(DataStores {
                accounts: Arc::new(InMemoryAccountStore::new()),
                audit_writer: audits.clone(),
                audit_reader: audits,
            })
        }
        StorageBackend::Mongo => {
            info!("📡 데이터베이스 연결 중...");
            let database = Arc::new(Database::connect(storage).await?);
            info!("✅ MongoDB 연결 성공");

            let redis = shared_redis(redis, &storage.redis_url).await?;

            let accounts = MongoAccountStore::new(database.clone(), redis, storage.cache_ttl_secs);
            accounts.create_indexes().await?;

            let audits = Arc::new(MongoAuditRepository::new(database));
            audits.create_indexes().await?;

            Ok(DataStores {
                accounts: Arc::new(accounts),
                audit_writer: audits.clone(),
                audit_reader: audits,
            })
        }
    }
}

/// 설정된 전송 방식으로 확인 이메일 이벤트 채널을 만듭니다
async fn initialize_event_channel(
    settings: &AppSettings,
    redis: &mut Option<Arc<RedisClient>>,
) -> AppResult<EventChannel> {
    let messaging = &settings.messaging;

    match messaging.transport {
        MessagingTransport::Memory => {
            info!("📨 메모리 이벤트 버스 사용 (capacity: {})", messaging.channel_capacity);
            let bus = Arc::new(InMemoryEventBus::new(messaging.channel_capacity));
            Ok(EventChannel { publisher: bus.clone(), source: bus })
        }
        MessagingTransport::Redis => {
            let shared = shared_redis(redis, &settings.storage.redis_url).await?;
            // BRPOPLPUSH 대기는 소비자 전용 연결에서만 실행
            let consumer = Arc::new(RedisClient::connect(&settings.storage.redis_url).await?);
            info!("📨 Redis 이벤트 큐 사용: {}", messaging.queue_name);

            let queue = Arc::new(RedisEventQueue::new(shared, consumer, messaging.queue_name.clone()));
            queue.recover_in_flight().await?;
            Ok(EventChannel { publisher: queue.clone(), source: queue })
        }
    }
}

/// CORS 설정을 구성합니다
///
/// 허용 Origin은 `CORS_ALLOWED_ORIGINS` 설정에서 옵니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    let cors = allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
