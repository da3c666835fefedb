use anyhow::Error;
use jsonrest::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Comment {
    id: i64,
    body: String,
    published: bool,
    #[serde(rename = "postId")]
    post_id: i64,
    #[serde(rename = "userId")]
    user_id: i64,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Buyer {
    id: i64,
    name: String,
    country: String,
    total: i64,
}

fn fixture() -> Value {
    json!({
        "posts": [
            { "id": 1, "body": "foo" },
            { "id": 2, "body": "bar" }
        ],
        "tags": [
            { "id": 1, "body": "Technology" },
            { "id": 2, "body": "Photography" },
            { "id": 3, "body": "photo" }
        ],
        "users": [
            { "id": 1, "username": "Jim", "tel": "0123" },
            { "id": 2, "username": "George", "tel": "123" }
        ],
        "comments": [
            { "id": 1, "body": "foo", "published": true, "postId": 1, "userId": 1 },
            { "id": 2, "body": "bar", "published": false, "postId": 1, "userId": 2 },
            { "id": 3, "body": "baz", "published": false, "postId": 2, "userId": 1 },
            { "id": 4, "body": "qux", "published": true, "postId": 2, "userId": 2 },
            { "id": 5, "body": "quux", "published": false, "postId": 2, "userId": 1 }
        ],
        "buyers": [
            { "id": 1, "name": "Aileen", "country": "Colombia", "total": 100 },
            { "id": 2, "name": "Barney", "country": "Colombia", "total": 200 },
            { "id": 3, "name": "Carley", "country": "Colombia", "total": 300 },
            { "id": 4, "name": "Daniel", "country": "Italy", "total": 30 },
            { "id": 5, "name": "Ellen", "country": "Italy", "total": 20 },
            { "id": 6, "name": "Frank", "country": "Italy", "total": 10 },
            { "id": 7, "name": "Grace", "country": "Argentina", "total": 1 },
            { "id": 8, "name": "Henry", "country": "Argentina", "total": 2 },
            { "id": 9, "name": "Isabelle", "country": "Argentina", "total": 3 }
        ],
        "deep": [
            { "a": { "b": 1 } },
            { "a": 1 }
        ],
        "nested": [
            { "resource": { "name": "dewey" } },
            { "resource": { "name": "cheatem" } },
            { "resource": { "name": "howe" } }
        ],
        "list": [
            { "id": 1 }, { "id": 2 }, { "id": 3 }, { "id": 4 }, { "id": 5 },
            { "id": 6 }, { "id": 7 }, { "id": 8 }, { "id": 9 }, { "id": 10 },
            { "id": 11 }, { "id": 12 }, { "id": 13 }, { "id": 14 }, { "id": 15 }
        ],
        "profile": { "name": "typicode" }
    })
}

fn spawn_jsonrest(config: EngineConfig) -> Result<JsonRest, Error> {
    let _ = env_logger::builder().is_test(true).try_init();
    JsonRest::from_value(fixture(), config)
}

fn ids(items: &[Value]) -> Vec<i64> {
    items.iter().filter_map(|item| item["id"].as_i64()).collect()
}

#[tokio::test]
async fn find_many_typed() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::new().filter("published", "true");
    let comments = db.find_many::<Comment>("comments", &query).await?.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].body, "qux");
    assert_eq!(comments[1].post_id, 2);
    Ok(())
}

#[tokio::test]
async fn find_many_unknown_resource() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    assert!(db.find_many::<Value>("nope", &Query::new()).await?.is_none());
    assert!(db.list("profile", &Query::new()).await.is_none());
    Ok(())
}

#[tokio::test]
async fn filter_conjunction() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::new()
        .filter("id_gte", "2")
        .filter("id_lte", "5")
        .filter("id_ne", "4")
        .filter("body_like", "u");
    let items = db.list_values("comments", &query).await?.unwrap();
    assert_eq!(ids(&items), vec![5]);

    // every value of a not-equal key must differ
    let query = Query::new().filter("id_ne", "1").filter("id_ne", "2");
    let items = db.list_values("comments", &query).await?.unwrap();
    assert_eq!(ids(&items), vec![3, 4, 5]);

    // any value of an equality key may match
    let query = Query::new().filter("id", "1").filter("id", "2");
    let items = db.list_values("comments", &query).await?.unwrap();
    assert_eq!(ids(&items), vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn filter_by_string_and_nested_path() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let users = db
        .list_values("users", &Query::new().filter("tel", "123"))
        .await?
        .unwrap();
    assert_eq!(ids(&users), vec![2]);

    let deep = db
        .list_values("deep", &Query::new().filter("a.b", "1"))
        .await?
        .unwrap();
    assert_eq!(deep, vec![json!({ "a": { "b": 1 } })]);

    let nested = db
        .list_values("nested", &Query::new().filter("resource.name", "dewey"))
        .await?
        .unwrap();
    assert_eq!(nested.len(), 1);
    Ok(())
}

#[tokio::test]
async fn ignores_unknown_parameters() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::from_pairs([("foo", "bar"), ("callback", "cb")]);
    let items = db.list_values("comments", &query).await?.unwrap();
    assert_eq!(items.len(), 5);
    Ok(())
}

#[tokio::test]
async fn full_text_search() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let tags = db
        .list_values("tags", &Query::new().q("PHOTO"))
        .await?
        .unwrap();
    assert_eq!(ids(&tags), vec![2, 3]);

    let nested = db
        .list_values("nested", &Query::new().q("che"))
        .await?
        .unwrap();
    assert_eq!(nested, vec![json!({ "resource": { "name": "cheatem" } })]);
    Ok(())
}

#[tokio::test]
async fn sort_by_multiple_keys() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::from_pairs([("_sort", "country,total"), ("_order", "asc,desc")]);
    let buyers = db.find_many::<Buyer>("buyers", &query).await?.unwrap();
    let ids: Vec<i64> = buyers.iter().map(|buyer| buyer.id).collect();
    assert_eq!(ids, vec![9, 8, 7, 3, 2, 1, 4, 5, 6]);
    Ok(())
}

#[tokio::test]
async fn sort_defaults_to_ascending() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::new().sort_by("body", OrderDirection::default());
    let tags = db.list_values("tags", &query).await?.unwrap();
    // uppercase sorts before lowercase
    assert_eq!(ids(&tags), vec![2, 1, 3]);
    Ok(())
}

#[tokio::test]
async fn paginate_by_page() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let query = Query::from_pairs([("_page", "2"), ("_limit", "2")]);
    let result = db.list("list", &query).await.unwrap();
    assert_eq!(ids(&result.items), vec![3, 4]);
    assert_eq!(result.total, Some(15));

    let page = result.page.unwrap();
    let links = Links::build(&page, "http://localhost:3000/list?_page=2&_limit=2");
    assert_eq!(
        links.last.as_deref(),
        Some("http://localhost:3000/list?_page=8&_limit=2")
    );
    assert_eq!(
        links.prev.as_deref(),
        Some("http://localhost:3000/list?_page=1&_limit=2")
    );
    Ok(())
}

#[tokio::test]
async fn paginate_by_page_defaults() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let result = db
        .list("list", &Query::from_pairs([("_page", "2")]))
        .await
        .unwrap();
    assert_eq!(ids(&result.items), vec![11, 12, 13, 14, 15]);
    let page = result.page.unwrap();
    assert_eq!(page.next, None);
    assert_eq!(page.last, Some(2));

    let result = db
        .list("list", &Query::from_pairs([("_page", "9")]))
        .await
        .unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.page.unwrap().current, None);
    Ok(())
}

#[tokio::test]
async fn paginate_by_slice_and_limit() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let result = db
        .list("comments", &Query::from_pairs([("_start", "1"), ("_end", "3")]))
        .await
        .unwrap();
    assert_eq!(ids(&result.items), vec![2, 3]);
    assert_eq!(result.total, Some(5));

    let result = db
        .list("comments", &Query::from_pairs([("_start", "1"), ("_limit", "2")]))
        .await
        .unwrap();
    assert_eq!(ids(&result.items), vec![2, 3]);

    let result = db
        .list("comments", &Query::from_pairs([("_end", "2"), ("_limit", "4")]))
        .await
        .unwrap();
    assert_eq!(ids(&result.items), vec![1, 2]);

    let result = db
        .list("comments", &Query::from_pairs([("_start", "2")]))
        .await
        .unwrap();
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.total, None);
    Ok(())
}

#[tokio::test]
async fn embed_and_expand() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let post = db
        .show::<Value>("posts", Some("1"), &Query::from_pairs([("_embed", "comments")]))
        .await?
        .unwrap();
    assert_eq!(ids(post["comments"].as_array().unwrap()), vec![1, 2]);

    let comment = db
        .show::<Value>(
            "comments",
            Some("1"),
            &Query::from_pairs([("_expand", "post"), ("_expand", "user")]),
        )
        .await?
        .unwrap();
    assert_eq!(comment["post"], json!({ "id": 1, "body": "foo" }));
    assert_eq!(comment["user"]["username"], "Jim");

    let posts = db
        .list_values("posts", &Query::from_pairs([("_embed", "comments,missing")]))
        .await?
        .unwrap();
    assert_eq!(posts[1]["comments"].as_array().unwrap().len(), 3);
    assert!(posts[1].get("missing").is_none());
    Ok(())
}

#[tokio::test]
async fn show_with_projection() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let user = db
        .show::<Value>("users", Some("2"), &Query::new().fields(&["id", "username"]))
        .await?
        .unwrap();
    assert_eq!(user, json!({ "id": 2, "username": "George" }));

    let profile = db.show::<Value>("profile", None, &Query::new()).await?;
    assert_eq!(profile, Some(json!({ "name": "typicode" })));
    assert!(db.show::<Value>("users", Some("9"), &Query::new()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn create_assigns_ids() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let created = db
        .create("posts", json!({ "id": 1, "body": "new" }))
        .await?
        .unwrap();
    assert_eq!(created.value, json!({ "id": 3, "body": "new" }));
    assert_eq!(created.location.as_deref(), Some("posts/3"));

    let created = db
        .create(
            "users",
            vec![json!({ "username": "Ann" }), json!({ "username": "Bob" })],
        )
        .await?
        .unwrap();
    assert_eq!(ids(created.value.as_array().unwrap()), vec![3, 4]);
    assert_eq!(db.list("users", &Query::new()).await.unwrap().items.len(), 4);
    assert!(db.create("nope", json!({})).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn replace_and_patch() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    let replaced = db
        .replace("posts", Some("1"), json!({ "title": "replaced" }))
        .await?
        .unwrap();
    assert_eq!(replaced, json!({ "id": 1, "title": "replaced" }));

    let patched = db
        .patch("comments", Some("1"), json!({ "body": "patched" }))
        .await?
        .unwrap();
    assert_eq!(patched["body"], "patched");
    assert_eq!(patched["postId"], 1);

    let profile = db
        .patch("profile", None, json!({ "age": 42 }))
        .await?
        .unwrap();
    assert_eq!(profile, json!({ "name": "typicode", "age": 42 }));
    assert!(db.patch("posts", Some("9"), json!({})).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn delete_cascades() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    assert!(db.delete("posts", "2").await?);
    let comments = db.list_values("comments", &Query::new()).await?.unwrap();
    assert_eq!(ids(&comments), vec![1, 2]);

    assert!(db.delete("users", "1").await?);
    let comments = db.list_values("comments", &Query::new()).await?.unwrap();
    assert_eq!(ids(&comments), vec![2]);

    assert!(!db.delete("users", "1").await?);
    Ok(())
}

#[tokio::test]
async fn fake_mode_leaves_state_untouched() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default().fake(true))?;
    let before = db.state().await;

    let created = db.create("posts", json!({ "body": "x" })).await?.unwrap();
    assert_eq!(created.value["id"], 3);
    let patched = db.patch("posts", Some("1"), json!({ "body": "y" })).await?;
    assert_eq!(patched, Some(json!({ "id": 1, "body": "y" })));
    assert!(db.delete("posts", "1").await?);

    assert_eq!(db.state().await, before);
    Ok(())
}

#[tokio::test]
async fn persists_to_file() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("db.json");
    std::fs::write(&path, serde_json::to_vec(&fixture())?)?;

    let db = JsonRest::open(&path, EngineConfig::default())?;
    db.create("posts", json!({ "body": "saved" })).await?;
    db.delete("users", "2").await?;

    let reopened = JsonRest::open(&path, EngineConfig::default())?;
    let posts = reopened.list_values("posts", &Query::new()).await?.unwrap();
    assert_eq!(posts.last(), Some(&json!({ "id": 3, "body": "saved" })));
    let comments = reopened
        .list_values("comments", &Query::new())
        .await?
        .unwrap();
    assert_eq!(ids(&comments), vec![1, 3, 5]);
    Ok(())
}

#[tokio::test]
async fn fake_mode_does_not_write() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("db.json");
    std::fs::write(&path, r#"{"posts":[]}"#)?;

    let db = JsonRest::open(&path, EngineConfig::default().fake(true))?;
    db.create("posts", json!({ "body": "x" })).await?;
    assert_eq!(std::fs::read_to_string(&path)?, r#"{"posts":[]}"#);
    Ok(())
}

#[tokio::test]
async fn custom_id_and_suffix() -> Result<(), Error> {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = JsonRest::from_value(
        json!({
            "posts": [{ "_id": "a" }],
            "comments": [{ "_id": "c", "post_id": "a" }]
        }),
        EngineConfig::new().id_field("_id").foreign_key_suffix("_id"),
    )?;
    let post = db
        .show::<Value>("posts", Some("a"), &Query::new().embed("comments"))
        .await?
        .unwrap();
    assert_eq!(post["comments"], json!([{ "_id": "c", "post_id": "a" }]));

    let created = db.create("posts", json!({})).await?.unwrap();
    assert!(created.value["_id"].is_string());
    assert!(db.delete("posts", "a").await?);
    assert_eq!(db.state().await["comments"], json!([]));
    Ok(())
}

#[tokio::test]
async fn set_state_replaces_everything() -> Result<(), Error> {
    let db = spawn_jsonrest(EngineConfig::default())?;
    db.set_state(json!({ "todos": [] })).await?;
    assert_eq!(db.resources().await, vec![("todos".to_string(), ResourceKind::Collection)]);
    assert!(db.set_state(json!({ "todos": 1 })).await.is_err());
    Ok(())
}
