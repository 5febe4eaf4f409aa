use serde_json::json;

use crate::common::{routes, TestApp};

#[tokio::test]
async fn created_category_is_listed_and_fetchable() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let id = app.create_category(&alice.token, "Bundesliga").await;

    let list = app.get_without_token(routes::CATEGORIES).await;
    assert_eq!(list.status, 200);
    assert_eq!(list.body.as_array().unwrap().len(), 1);

    let one = app.get_without_token(&routes::category(&id)).await;
    assert_eq!(one.status, 200);
    assert_eq!(one.body["name"], "Bundesliga");
}

#[tokio::test]
async fn creating_a_category_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::CATEGORIES,
            &json!({ "name": "La Liga", "description": "Spain" }),
        )
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    app.create_category(&alice.token, "La Liga").await;

    let res = app
        .post_with_token(
            routes::CATEGORIES,
            &json!({ "name": "La Liga", "description": "Again" }),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn patch_changes_only_non_empty_fields() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let id = app.create_category(&alice.token, "World Cup").await;

    let res = app
        .patch_with_token(
            &routes::category(&id),
            &json!({ "name": "", "description": "International tournaments" }),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "World Cup");
    assert_eq!(res.body["description"], "International tournaments");
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let missing = app
        .get_without_token(&routes::category("00000000-0000-0000-0000-000000000000"))
        .await;
    assert_eq!(missing.status, 404);

    let malformed = app.get_without_token(&routes::category("nope")).await;
    assert_eq!(malformed.status, 400);

    let patch_missing = app
        .patch_with_token(
            &routes::category("00000000-0000-0000-0000-000000000000"),
            &json!({ "name": "Serie A" }),
            &alice.token,
        )
        .await;
    assert_eq!(patch_missing.status, 404);
}
