use std::time::Duration;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header},
    middleware::{DefaultHeaders, Next},
    web::Data,
};
use serde_json::json;

use crate::app_data::AppData;

/// Headers that keep clients from caching any answer.
pub fn no_cache() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, "no-cache"))
        .add((header::PRAGMA, "no-cache"))
        .add((header::EXPIRES, "-1"))
}

/// Milliseconds from a `_delay` query parameter, falling back to the server
/// wide delay.
fn delay_for(req: &ServiceRequest, default: u64) -> u64 {
    actix_web::web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .ok()
        .and_then(|query| {
            query
                .iter()
                .find(|(key, _)| key == "_delay")
                .and_then(|(_, value)| value.trim().parse::<f64>().ok())
        })
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms as u64)
        .unwrap_or(default)
}

pub async fn delay(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let default = req
        .app_data::<Data<AppData>>()
        .map(|app_data| app_data.delay)
        .unwrap_or(0);
    let ms = delay_for(&req, default);
    if ms > 0 {
        log::debug!("Delaying {} for {}ms", req.path(), ms);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    next.call(req).await
}

/// Rejects anything but GET with 403 when the server is read only.
pub async fn read_only(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let read_only = req
        .app_data::<Data<AppData>>()
        .is_some_and(|app_data| app_data.read_only);
    if read_only && req.method() != Method::GET {
        log::debug!("Rejecting {} {} in read only mode", req.method(), req.path());
        let response = HttpResponse::Forbidden().json(json!({}));
        return Ok(req.into_response(response).map_into_right_body());
    }
    Ok(next.call(req).await?.map_into_left_body())
}
