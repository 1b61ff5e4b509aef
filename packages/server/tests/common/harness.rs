//! Test harness with testcontainers for integration testing.
//!
//! The Postgres container starts once and is shared by every test; each test
//! gets a fresh pool and stub collaborators wired into `ServerDeps`.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::common::UserId;
use server_core::domains::auth::JwtService;
use server_core::domains::users::models::User;
use server_core::kernel::test_dependencies::{
    StubIdentityService, StubSmsService, StubStorageService,
};
use server_core::kernel::ServerDeps;

/// Shared test infrastructure: one container, migrations run once.
struct SharedTestInfra {
    db_url: String,
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with RUST_LOG=debug for query-level output.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool over the shared database plus stub
/// collaborators the test can script and inspect.
pub struct TestHarness {
    pub db_pool: PgPool,
    pub sms: Arc<StubSmsService>,
    pub identity: Arc<StubIdentityService>,
    pub storage: Arc<StubStorageService>,
    pub jwt_service: Arc<JwtService>,
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let sms = Arc::new(StubSmsService::new());
        let identity = Arc::new(StubIdentityService::passing("certify-test"));
        let storage = Arc::new(StubStorageService::default());
        let jwt_service = Arc::new(JwtService::new("test_secret", "test_issuer".to_string()));

        let deps = ServerDeps::new(
            db_pool.clone(),
            sms.clone(),
            identity.clone(),
            storage.clone(),
            jwt_service.clone(),
        );

        Ok(Self {
            db_pool,
            sms,
            identity,
            storage,
            jwt_service,
            deps,
        })
    }

    /// Register a user through the same path production uses.
    pub async fn create_user(&self, phone: &str) -> User {
        User::create_phone_user(phone, &self.db_pool)
            .await
            .expect("create user");
        User::find_by_phone(phone, &self.db_pool)
            .await
            .expect("fetch user")
            .expect("user row exists")
    }

    /// Register a user and mark them verified, bypassing the external check.
    pub async fn create_verified_user(&self, phone: &str, gender: i32) -> User {
        let user = self.create_user(phone).await;
        User::mark_verified(user.id, gender, &self.db_pool)
            .await
            .expect("mark verified");
        User::find_by_id(user.id, &self.db_pool)
            .await
            .expect("fetch user")
            .expect("user row exists")
    }

    /// Insert a code record directly, sidestepping rate limits. `age_secs`
    /// shifts `created_at` into the past; expiry stays relative to that.
    pub async fn seed_code(&self, phone: &str, code: &str, age_secs: i64) {
        sqlx::query(
            r#"
            INSERT INTO sms_codes (phone, code, expires_at, created_at)
            VALUES (
                $1, $2,
                now() - make_interval(secs => $3) + interval '300 seconds',
                now() - make_interval(secs => $3)
            )
            "#,
        )
        .bind(phone)
        .bind(code)
        .bind(age_secs as f64)
        .execute(&self.db_pool)
        .await
        .expect("seed sms code");
    }

    pub async fn fetch_user(&self, id: UserId) -> User {
        User::find_by_id(id, &self.db_pool)
            .await
            .expect("fetch user")
            .expect("user row exists")
    }
}
