use serde_json::json;

use crate::common::{entry_body, routes, TestApp};

#[tokio::test]
async fn comment_carries_its_author() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let category = app.create_category(&alice.token, "Bundesliga").await;
    let entry = app
        .create_entry(&alice.token, &entry_body("Der Klassiker", &category))
        .await;

    let res = app
        .post_with_token(
            routes::COMMENTS,
            &json!({ "entryId": entry, "content": "Dortmund will win 2-1." }),
            &bob.token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["entryId"], entry.as_str());
    assert_eq!(res.body["author"]["username"], "bob");
    assert!(res.body.get("entryTitle").is_none());
}

#[tokio::test]
async fn commenting_on_a_missing_entry() {
    let app = TestApp::spawn().await;
    let bob = app.register("bob").await;

    let res = app
        .post_with_token(
            routes::COMMENTS,
            &json!({ "entryId": "0d5d8a0e-3c57-4a5e-8f0b-7d7e4b1a2c33", "content": "Hello?" }),
            &bob.token,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.message(), "Blog entry not found");
}

#[tokio::test]
async fn closed_entries_refuse_comments() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let category = app.create_category(&alice.token, "Bundesliga").await;
    let mut body = entry_body("Closed", &category);
    body["commentsAllowed"] = json!(false);
    let entry = app.create_entry(&alice.token, &body).await;

    let res = app
        .post_with_token(
            routes::COMMENTS,
            &json!({ "entryId": entry, "content": "Let me in" }),
            &bob.token,
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.message(), "Comments are not allowed for this blog entry");
}

#[tokio::test]
async fn commenting_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::COMMENTS,
            &json!({ "entryId": "0d5d8a0e-3c57-4a5e-8f0b-7d7e4b1a2c33", "content": "Hi" }),
        )
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn entry_comments_are_newest_first() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let category = app.create_category(&alice.token, "Bundesliga").await;
    let entry = app
        .create_entry(&alice.token, &entry_body("Busy thread", &category))
        .await;
    app.create_comment(&alice.token, &entry, "first").await;
    app.create_comment(&alice.token, &entry, "second").await;

    let res = app.get_without_token(&routes::entry_comments(&entry)).await;

    assert_eq!(res.status, 200);
    let contents: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["second", "first"]);
}

#[tokio::test]
async fn only_the_author_may_delete_a_comment() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let category = app.create_category(&alice.token, "Bundesliga").await;
    let entry = app
        .create_entry(&alice.token, &entry_body("Moderation", &category))
        .await;
    let comment = app.create_comment(&bob.token, &entry, "Mine").await;

    let by_entry_author = app
        .delete_with_token(&routes::comment(&comment), &alice.token)
        .await;
    assert_eq!(by_entry_author.status, 403);
    assert_eq!(
        by_entry_author.message(),
        "You can only delete your own comments"
    );

    let anonymous = app.delete_without_token(&routes::comment(&comment)).await;
    assert_eq!(anonymous.status, 401);

    let by_author = app
        .delete_with_token(&routes::comment(&comment), &bob.token)
        .await;
    assert_eq!(by_author.status, 200);
    assert_eq!(by_author.message(), "Comment deleted successfully");

    let gone = app
        .delete_with_token(&routes::comment(&comment), &bob.token)
        .await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn latest_comments_on_a_users_entries() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let category = app.create_category(&alice.token, "Premier League").await;
    let first = app
        .create_entry(&alice.token, &entry_body("Liverpool", &category))
        .await;
    let second = app
        .create_entry(&alice.token, &entry_body("Arsenal", &category))
        .await;
    let foreign = app
        .create_entry(&bob.token, &entry_body("Chelsea", &category))
        .await;
    app.create_comment(&bob.token, &first, "oldest").await;
    app.create_comment(&bob.token, &second, "middle").await;
    app.create_comment(&bob.token, &first, "newest").await;
    app.create_comment(&alice.token, &foreign, "elsewhere").await;

    let res = app.get_without_token(&routes::latest_comments("alice")).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let comments = res.body.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "newest");
    assert_eq!(comments[0]["entryTitle"], "Liverpool");
    assert_eq!(comments[1]["content"], "middle");
    assert_eq!(comments[1]["entryTitle"], "Arsenal");
}

#[tokio::test]
async fn latest_comments_need_a_user_with_entries() {
    let app = TestApp::spawn().await;
    app.register("alice").await;

    let unknown = app.get_without_token(&routes::latest_comments("nobody")).await;
    assert_eq!(unknown.status, 404);

    let no_entries = app.get_without_token(&routes::latest_comments("alice")).await;
    assert_eq!(no_entries.status, 404);
}
