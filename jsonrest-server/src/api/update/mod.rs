use actix_web::{
    HttpRequest, Responder,
    http::{Method, StatusCode},
    route,
    web::{Bytes, Data, Path},
};

use super::{ApiError, DocumentPath, ResourcePath, Response, parse_body};

use crate::app_data::AppData;

/// PUT replaces, PATCH merges.
async fn update_response(
    app_data: &AppData,
    req: &HttpRequest,
    name: &str,
    id: Option<&str>,
    body: &[u8],
) -> Response {
    let body = match parse_body(body) {
        Ok(body) => body,
        Err(err) => return err.into(),
    };
    let jsonrest = &app_data.database.jsonrest;
    let updated = if req.method() == Method::PATCH {
        jsonrest.patch(name, id, body).await
    } else {
        jsonrest.replace(name, id, body).await
    };
    match updated {
        Ok(Some(value)) => Response::new(StatusCode::OK).body(value),
        Ok(None) => Response::not_found(),
        Err(err) => ApiError::from(err).into(),
    }
}

#[route("/{resource}", method = "PUT", method = "PATCH")]
pub async fn update_singleton(
    app_data: Data<AppData>,
    path: Path<ResourcePath>,
    body: Bytes,
    req: HttpRequest,
) -> impl Responder {
    update_response(&app_data, &req, &path.resource, None, &body).await
}

#[route("/{resource}/{id}", method = "PUT", method = "PATCH")]
pub async fn update(
    app_data: Data<AppData>,
    path: Path<DocumentPath>,
    body: Bytes,
    req: HttpRequest,
) -> impl Responder {
    update_response(&app_data, &req, &path.resource, Some(&path.id), &body).await
}
