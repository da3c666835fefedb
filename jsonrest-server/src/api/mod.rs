use actix_web::{
    HttpRequest, HttpResponse, Responder,
    body::BoxBody,
    http::StatusCode,
    web,
};
use jsonrest::DatabaseError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub mod create;
pub mod db;
pub mod delete;
pub mod list;
pub mod nested;
pub mod show;
pub mod update;

pub struct Response {
    pub status_code: StatusCode,
    pub body: Value,
    pub headers: Vec<(&'static str, String)>,
}

impl Response {
    /// An empty object body with the given status.
    pub fn new(status_code: StatusCode) -> Self {
        Response {
            status_code,
            body: json!({}),
            headers: vec![],
        }
    }

    pub fn not_found() -> Self {
        Response::new(StatusCode::NOT_FOUND)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// JSONP callback name, stripped to characters valid in a JS member path.
fn jsonp_callback(req: &HttpRequest) -> Option<String> {
    let callback = query_pairs(req)
        .into_iter()
        .find(|(key, _)| key == "callback")
        .map(|(_, value)| value)?;
    let callback: String = callback
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'))
        .collect();
    (!callback.is_empty()).then_some(callback)
}

impl Responder for Response {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        let mut builder = HttpResponse::build(self.status_code);
        for header in self.headers {
            builder.insert_header(header);
        }
        let json = match serde_json::to_string_pretty(&self.body) {
            Ok(json) => json,
            Err(err) => {
                log::error!("{:?}", err);
                return HttpResponse::InternalServerError().finish();
            }
        };
        match jsonp_callback(req) {
            Some(callback) => builder
                .content_type("text/javascript; charset=utf-8")
                .body(format!(
                    "/**/ typeof {callback} === 'function' && {callback}({json});"
                )),
            None => builder
                .content_type("application/json; charset=utf-8")
                .body(json),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DatabaseError>() {
            Some(DatabaseError::InvalidBody(message)) => ApiError::BadRequest(message.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl From<ApiError> for Response {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(message) => {
                log::warn!("Bad request: {}", message);
                Response::new(StatusCode::BAD_REQUEST)
            }
            ApiError::Internal(err) => {
                log::error!("{:?}", err);
                Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ResourcePath {
    pub resource: String,
}

#[derive(Serialize, Deserialize)]
pub struct DocumentPath {
    pub resource: String,
    pub id: String,
}

#[derive(Serialize, Deserialize)]
pub struct NestedPath {
    pub resource: String,
    pub id: String,
    pub nested: String,
}

/// Decoded query string pairs, repeated keys included.
pub fn query_pairs(req: &HttpRequest) -> Vec<(String, String)> {
    web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(|query| query.into_inner())
        .unwrap_or_default()
}

/// The URL the client requested, query string included.
pub fn full_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.uri())
}

/// Parse a request body. An empty body reads as an empty object.
pub fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|err| ApiError::BadRequest(err.to_string()))
}

pub const X_TOTAL_COUNT: &str = "X-Total-Count";
pub const LINK: &str = "Link";
pub const LOCATION: &str = "Location";
pub const EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";

pub async fn not_found() -> impl Responder {
    Response::not_found()
}
