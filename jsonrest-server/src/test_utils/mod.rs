use std::sync::Once;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test,
};
use serde_json::{Value, json};

use crate::{app_data::AppData, build_app, database::Database};
use jsonrest::EngineConfig;

static INIT: Once = Once::new();

pub fn fixture() -> Value {
    json!({
        "posts": [
            { "id": 1, "body": "foo" },
            { "id": 2, "body": "bar" }
        ],
        "comments": [
            { "id": 1, "body": "foo", "published": true, "postId": 1, "userId": 1 },
            { "id": 2, "body": "bar", "published": false, "postId": 1, "userId": 2 },
            { "id": 3, "body": "baz", "published": false, "postId": 2, "userId": 1 },
            { "id": 4, "body": "qux", "published": true, "postId": 2, "userId": 2 },
            { "id": 5, "body": "quux", "published": false, "postId": 2, "userId": 1 }
        ],
        "users": [
            { "id": 1, "username": "Jim", "tel": "0123" },
            { "id": 2, "username": "George", "tel": "123" }
        ],
        "refs": [{ "id": "abcd-1234", "url": "http://example.com", "postId": 1 }],
        "list": [
            { "id": 1 }, { "id": 2 }, { "id": 3 }, { "id": 4 }, { "id": 5 },
            { "id": 6 }, { "id": 7 }, { "id": 8 }, { "id": 9 }, { "id": 10 },
            { "id": 11 }, { "id": 12 }, { "id": 13 }, { "id": 14 }, { "id": 15 }
        ],
        "profile": { "name": "typicode" }
    })
}

pub struct TestOptions {
    pub config: EngineConfig,
    pub read_only: bool,
    pub delay: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        TestOptions {
            config: EngineConfig::default(),
            read_only: false,
            delay: 0,
        }
    }
}

pub async fn setup_test_app(
    options: TestOptions,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    INIT.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });

    let database =
        Database::from_value(fixture(), options.config).expect("Failed to load fixture");
    let app_data = AppData {
        database,
        read_only: options.read_only,
        delay: options.delay,
        quiet: true,
    };

    test::init_service(build_app(app_data)).await
}

pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("Invalid JSON")
}
