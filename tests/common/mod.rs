#![allow(dead_code)]

use std::time::Duration;

use mealie_sdk::config::{ClientConfig, ClientConfigBuilder};
use mealie_sdk::MealieClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "static-test-token";
pub const TEST_USERNAME: &str = "cook";
pub const TEST_PASSWORD: &str = "s3cret";

/// A mocked Mealie server plus helpers to build clients against it.
pub struct TestEnvironment {
    pub server: MockServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        init_test_logging();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Builder with short delays so retry tests stay fast.
    pub fn config(&self) -> ClientConfigBuilder {
        ClientConfig::builder(self.base_url())
            .timeout(Duration::from_secs(5))
            .retry_delay(Duration::from_millis(10))
    }

    pub fn token_client(&self) -> MealieClient {
        let config = self.config().token(TEST_TOKEN).build().expect("valid config");
        MealieClient::new(config).expect("client builds")
    }

    pub fn password_client(&self) -> MealieClient {
        let config = self
            .config()
            .password(TEST_USERNAME, TEST_PASSWORD)
            .build()
            .expect("valid config");
        MealieClient::new(config).expect("client builds")
    }

    pub fn client_with(&self, builder: ClientConfigBuilder) -> MealieClient {
        MealieClient::new(builder.build().expect("valid config")).expect("client builds")
    }

    /// Login endpoint answering with `token`, valid for `times` logins.
    pub async fn mock_login(&self, token: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "token_type": "bearer"
            })))
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Fails the test on drop if anything posts to the login endpoint.
    pub async fn forbid_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, wanted_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == wanted_path)
            .count()
    }

    /// JSON bodies of every request sent to `wanted_path` with `verb`.
    pub async fn bodies_of(&self, verb: &str, wanted_path: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == wanted_path)
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
            .collect()
    }
}

pub fn recipe_json(slug: &str, name: &str) -> Value {
    json!({
        "id": format!("id-{}", slug),
        "userId": "user-1",
        "groupId": "group-1",
        "name": name,
        "slug": slug,
        "description": format!("{} description", name),
        "recipeYield": "4 servings",
        "totalTime": "PT45M",
        "recipeIngredient": [{"note": "1 cup stock"}],
        "recipeInstructions": [{"text": "Cook it"}],
        "tags": [{"name": "weeknight", "slug": "weeknight"}],
        "dateAdded": "2024-02-10",
        "dateUpdated": "2024-02-11T08:00:00"
    })
}

pub fn summary_json(slug: &str, name: &str) -> Value {
    json!({"id": format!("id-{}", slug), "name": name, "slug": slug})
}

pub fn page_json(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "page": 1,
        "per_page": 50,
        "total": total,
        "total_pages": 1,
        "items": items,
        "next": null,
        "previous": null
    })
}

pub fn user_json(id: &str, username: &str, admin: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "fullName": "Test Cook",
        "admin": admin,
        "group": "Home",
        "groupId": "group-1"
    })
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
