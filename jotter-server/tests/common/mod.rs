// Shared harness for router tests: in-memory SQLite, in-memory sessions.
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use tracing_subscriber::EnvFilter;

use jotter_server::db::{create_pool_with_options, migrations};
use jotter_server::http::{
    build_router, session_layer, AppState, Mode, ServerConfig, SESSION_COOKIE,
};

pub struct TestApp {
    router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    /// Raw `Set-Cookie` header for the session cookie, if sent
    pub set_cookie: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// Handler logs go to the captured test output; `RUST_LOG` overrides `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

impl TestApp {
    pub async fn new(mode: Mode) -> Self {
        init_tracing();
        let pool = create_pool_with_options("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        migrations::run(&pool).await.expect("migrations");

        let config = ServerConfig {
            mode,
            ..ServerConfig::default()
        };
        let sessions = session_layer(MemoryStore::default(), &config);
        let router = build_router(AppState::new(pool.clone(), &config), sessions);

        Self { router, pool }
    }

    pub async fn get(&self, uri: &str, browser: &mut Browser) -> TestResponse {
        let request = browser.attach(Request::get(uri)).body(Body::empty()).unwrap();
        self.send(request, browser).await
    }

    /// POST `fields` as `application/x-www-form-urlencoded`.
    pub async fn post(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        browser: &mut Browser,
    ) -> TestResponse {
        let request = browser
            .attach(Request::post(uri))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        self.send(request, browser).await
    }

    async fn send(&self, request: Request<Body>, browser: &mut Browser) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let header = |name| {
            response
                .headers()
                .get(name)
                .map(|v| v.to_str().unwrap().to_owned())
        };
        let location = header(LOCATION);
        let content_type = header(CONTENT_TYPE);
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .find(|v| v.starts_with(&format!("{SESSION_COOKIE}=")));
        let status = response.status();

        if let Some(cookie) = &set_cookie {
            browser.store(cookie);
        }

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            location,
            set_cookie,
            content_type,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

/// Cookie jar holding the one session cookie
#[derive(Default)]
pub struct Browser {
    session: Option<String>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn attach(&self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        match &self.session {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    fn store(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default().trim();
        let removal = set_cookie.to_ascii_lowercase().contains("max-age=0")
            || pair.ends_with('=');
        self.session = (!removal).then(|| pair.to_owned());
    }
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl TestResponse {
    /// Target of the `<a>` whose text is `label`, with `&amp;` decoded.
    pub fn link(&self, label: &str) -> Option<String> {
        let end = self.body.find(&format!(">{label}</a>"))?;
        let start = self.body[..end].rfind("href=\"")? + "href=\"".len();
        let href = &self.body[start..end];
        let href = &href[..href.find('"')?];
        Some(href.replace("&amp;", "&"))
    }

    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}
