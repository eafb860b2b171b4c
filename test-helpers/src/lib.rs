pub mod mock;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod time;

use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use jiff::SignedDuration;
use payloads::{
    APIClient, ClientError, CredentialPolicy, MemoryCredentials, UserInfo,
    requests,
};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

use crate::mock::DevDataset;
use crate::store::{ClinicStore, TokenPolicy};
use crate::time::TimeSource;

/// Build the mock backend server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub async fn build(
    config: &mut Config,
    store: Arc<ClinicStore>,
) -> std::io::Result<Server> {
    let store = web::Data::from(store);
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|origin| origin == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            let mut cors =
                Cors::default().allow_any_method().allow_any_header();
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .service(routes::api_services())
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin
    pub allowed_origins: Vec<String>,
    pub tokens: TokenPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port: 0,
            allowed_origins: vec!["*".to_string()],
            tokens: TokenPolicy::default(),
        }
    }
}

impl Config {
    /// Read `IP_ADDRESS`, `PORT`, `ALLOWED_ORIGINS`, `ACCESS_TOKEN_TTL_SECS`
    /// and `REFRESH_TOKEN_TTL_SECS`, keeping the defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let mut config = Self::default();
        if let Ok(ip) = var("IP_ADDRESS") {
            config.ip = ip;
        }
        if let Ok(port) = var("PORT") {
            config.port = port.parse().context("PORT must be a port number")?;
        }
        if let Ok(origins) = var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(ttl) = ttl_from_env("ACCESS_TOKEN_TTL_SECS")? {
            config.tokens.access_ttl = ttl;
        }
        if let Some(ttl) = ttl_from_env("REFRESH_TOKEN_TTL_SECS")? {
            config.tokens.refresh_ttl = ttl;
        }
        Ok(config)
    }
}

fn ttl_from_env(key: &str) -> anyhow::Result<Option<SignedDuration>> {
    match std::env::var(key) {
        Ok(secs) => {
            let secs: i64 = secs.parse().with_context(|| {
                format!("{key} must be a number of seconds")
            })?;
            Ok(Some(SignedDuration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    /// The same store the client uses, kept concrete for inspection.
    pub credentials: Arc<MemoryCredentials>,
    pub store: Arc<ClinicStore>,
    pub time_source: TimeSource,
    pub dataset: DevDataset,
}

impl TestApp {
    pub async fn login(&self, email: &str) -> anyhow::Result<UserInfo> {
        let credentials = requests::LoginCredentials {
            email: email.into(),
            password: mock::PASSWORD.into(),
        };
        Ok(self.client.login(&credentials).await?)
    }

    pub async fn login_manager(&self) -> anyhow::Result<UserInfo> {
        self.login(mock::MANAGER_EMAIL).await
    }

    pub async fn login_doctor(&self) -> anyhow::Result<UserInfo> {
        self.login(mock::DOCTOR_EMAIL).await
    }

    pub async fn login_customer(&self) -> anyhow::Result<UserInfo> {
        self.login(mock::CUSTOMER_EMAIL).await
    }

    /// Move the backend clock past the access token lifetime. Refresh tokens
    /// stay valid.
    pub fn expire_access_tokens(&self) {
        let ttl = self.store.policy().access_ttl;
        self.time_source.advance(ttl + SignedDuration::from_secs(1));
    }

    /// Number of requests the backend has seen for an endpoint, given as the
    /// client names it (e.g. `auth/refresh`).
    pub fn hits(&self, endpoint: &str) -> usize {
        self.store.hits(&format!("/api/{endpoint}"))
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let time_source = TimeSource::new("2025-03-03T01:00:00Z".parse().unwrap());
    let mut config = Config {
        port,
        ..Default::default()
    };
    let store =
        Arc::new(ClinicStore::new(config.tokens, time_source.clone()));
    let dataset = DevDataset::seed(&store);

    let server = build(&mut config, store.clone()).await.unwrap();
    tokio::spawn(server);

    let credentials =
        Arc::new(MemoryCredentials::new(CredentialPolicy::default()));
    let client = APIClient::new(
        format!("http://127.0.0.1:{}", config.port),
        credentials.clone(),
    );

    TestApp {
        port: config.port,
        client,
        credentials,
        store,
        time_source,
        dataset,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::APIError(code, _)) => assert_eq!(code, expected),
        Err(e) => panic!("Expected APIError({expected}), got {e:?}"),
        Ok(_) => panic!("Expected APIError({expected}), got Ok"),
    };
}
