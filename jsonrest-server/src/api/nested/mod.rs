use actix_web::{
    HttpRequest, Responder, get, post,
    web::{Bytes, Data, Path},
};
use jsonrest::{Query, id_value};
use serde_json::Value;

use super::{NestedPath, Response, create::create_response, list::list_response, parse_body, query_pairs};

use crate::app_data::AppData;

/// `GET /posts/1/comments` lists `comments` with `postId=1`.
#[get("/{resource}/{id}/{nested}")]
pub async fn list_nested(
    app_data: Data<AppData>,
    path: Path<NestedPath>,
    req: HttpRequest,
) -> impl Responder {
    let config = app_data.database.jsonrest.config().await;
    let query = Query::from_pairs(query_pairs(&req))
        .set_filter(&config.foreign_key_for(&path.resource), &path.id);

    list_response(&app_data, &req, &path.nested, &query).await
}

/// `POST /posts/1/comments` creates in `comments` with `postId` set to 1.
#[post("/{resource}/{id}/{nested}")]
pub async fn create_nested(
    app_data: Data<AppData>,
    path: Path<NestedPath>,
    body: Bytes,
    req: HttpRequest,
) -> impl Responder {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(err) => return Response::from(err),
    };
    let config = app_data.database.jsonrest.config().await;
    let foreign_key = config.foreign_key_for(&path.resource);
    let reference = id_value(&path.id);

    let body = match body {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|mut item| {
                    if let Some(document) = item.as_object_mut() {
                        document.insert(foreign_key.clone(), reference.clone());
                    }
                    item
                })
                .collect(),
        ),
        Value::Object(mut document) => {
            document.insert(foreign_key, reference);
            Value::Object(document)
        }
        other => other,
    };

    create_response(&app_data, &req, &path.nested, body).await
}
