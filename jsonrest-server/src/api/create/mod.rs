use actix_web::{
    HttpRequest, Responder,
    http::StatusCode,
    post,
    web::{Bytes, Data, Path},
};
use serde_json::Value;

use super::{ApiError, EXPOSE_HEADERS, LOCATION, ResourcePath, Response, full_url, parse_body};

use crate::app_data::AppData;

/// Create in `name` and answer 201 with a `Location` pointing at the result.
pub async fn create_response(
    app_data: &AppData,
    req: &HttpRequest,
    name: &str,
    body: Value,
) -> Response {
    let created = match app_data.database.jsonrest.create(name, body).await {
        Ok(Some(created)) => created,
        Ok(None) => return Response::not_found(),
        Err(err) => return ApiError::from(err).into(),
    };

    let url = full_url(req);
    let location = created.location.as_deref().map(|location| {
        match location.strip_prefix(name).and_then(|rest| rest.strip_prefix('/')) {
            Some(id) => format!("{}/{}", url.trim_end_matches('/'), id),
            None => url.clone(),
        }
    });

    let response = Response::new(StatusCode::CREATED).body(created.value);
    match location {
        Some(location) => response
            .header(EXPOSE_HEADERS, "Location")
            .header(LOCATION, &location),
        None => response,
    }
}

#[post("/{resource}")]
pub async fn create(
    app_data: Data<AppData>,
    path: Path<ResourcePath>,
    body: Bytes,
    req: HttpRequest,
) -> impl Responder {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(err) => return Response::from(err),
    };
    create_response(&app_data, &req, &path.resource, body).await
}
