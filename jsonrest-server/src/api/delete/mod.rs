use actix_web::{
    Responder, delete,
    http::StatusCode,
    web::{Data, Path},
};

use super::{ApiError, DocumentPath, Response};

use crate::app_data::AppData;

#[delete("/{resource}/{id}")]
pub async fn delete_document(app_data: Data<AppData>, path: Path<DocumentPath>) -> impl Responder {
    match app_data
        .database
        .jsonrest
        .delete(&path.resource, &path.id)
        .await
    {
        Ok(true) => Response::new(StatusCode::OK),
        Ok(false) => Response::not_found(),
        Err(err) => ApiError::from(err).into(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::test_utils::{TestOptions, read_json, setup_test_app};

    #[actix_web::test]
    async fn test_delete() {
        let app = setup_test_app(TestOptions::default()).await;
        let req = test::TestRequest::delete().uri("/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(read_json(resp).await, json!({}));

        let req = test::TestRequest::get().uri("/comments").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(read_json(resp).await.as_array().unwrap().len(), 3);

        let req = test::TestRequest::get().uri("/refs").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(read_json(resp).await, json!([]));
    }

    #[actix_web::test]
    async fn test_delete_missing() {
        let app = setup_test_app(TestOptions::default()).await;
        let req = test::TestRequest::delete().uri("/posts/9").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(resp).await, json!({}));
    }
}
