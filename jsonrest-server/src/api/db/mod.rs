use actix_web::{Responder, get, http::StatusCode, web::Data};

use super::Response;

use crate::app_data::AppData;

#[get("/db")]
pub async fn db(app_data: Data<AppData>) -> impl Responder {
    let state = app_data.database.jsonrest.state().await;
    Response::new(StatusCode::OK).body(state)
}
