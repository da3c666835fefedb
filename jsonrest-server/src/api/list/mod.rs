use actix_web::{
    HttpRequest, Responder, get,
    http::StatusCode,
    web::{Data, Path},
};
use jsonrest::{Links, Query, ResourceKind};
use serde_json::Value;

use super::{EXPOSE_HEADERS, LINK, ResourcePath, Response, X_TOTAL_COUNT, full_url, query_pairs};

use crate::app_data::AppData;

/// List a collection, adding the total count when the query paginates and
/// page links in page mode.
pub async fn list_response(
    app_data: &AppData,
    req: &HttpRequest,
    name: &str,
    query: &Query,
) -> Response {
    let Some(result) = app_data.database.jsonrest.list(name, query).await else {
        return Response::not_found();
    };

    let mut response = Response::new(StatusCode::OK).body(Value::Array(result.items));
    if let Some(total) = result.total {
        response = response.header(X_TOTAL_COUNT, &total.to_string());
    }
    match result.page {
        Some(page) => {
            response = response.header(EXPOSE_HEADERS, "X-Total-Count, Link");
            if let Some(link) = Links::build(&page, &full_url(req)).header_value() {
                response = response.header(LINK, &link);
            }
        }
        None if result.total.is_some() => {
            response = response.header(EXPOSE_HEADERS, "X-Total-Count");
        }
        None => {}
    }
    response
}

#[get("/{resource}")]
pub async fn list(
    app_data: Data<AppData>,
    path: Path<ResourcePath>,
    req: HttpRequest,
) -> impl Responder {
    let query = Query::from_pairs(query_pairs(&req));

    match app_data.database.jsonrest.kind(&path.resource).await {
        Some(ResourceKind::Collection) => {
            list_response(&app_data, &req, &path.resource, &query).await
        }
        Some(ResourceKind::Singleton) => {
            match app_data.database.jsonrest.show::<Value>(&path.resource, None, &query).await {
                Ok(Some(value)) => Response::new(StatusCode::OK).body(value),
                Ok(None) => Response::not_found(),
                Err(err) => super::ApiError::from(err).into(),
            }
        }
        None => Response::not_found(),
    }
}
