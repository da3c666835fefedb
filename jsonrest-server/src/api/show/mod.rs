use actix_web::{
    HttpRequest, Responder, get,
    http::StatusCode,
    web::{Data, Path},
};
use jsonrest::Query;
use serde_json::Value;

use super::{ApiError, DocumentPath, Response, query_pairs};

use crate::app_data::AppData;

#[get("/{resource}/{id}")]
pub async fn show(
    app_data: Data<AppData>,
    path: Path<DocumentPath>,
    req: HttpRequest,
) -> impl Responder {
    let query = Query::from_pairs(query_pairs(&req));

    match app_data
        .database
        .jsonrest
        .show::<Value>(&path.resource, Some(&path.id), &query)
        .await
    {
        Ok(Some(value)) => Response::new(StatusCode::OK).body(value),
        Ok(None) => Response::not_found(),
        Err(err) => ApiError::from(err).into(),
    }
}
