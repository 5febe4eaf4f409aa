use serde_json::json;

use crate::common::{entry_body, routes, TestApp};

const UNKNOWN_ID: &str = "7b0c6a52-3f8e-4a51-9d3c-2a6f1f0e9b11";

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn created_entry_has_defaults_and_resolved_author() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;

        let res = app
            .post_with_token(
                routes::ENTRIES,
                &entry_body("Der Klassiker", &category),
                &alice.token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["commentsAllowed"], true);
        assert_eq!(res.body["impressionCount"], 0);
        assert_eq!(res.body["authors"][0]["username"], "alice");
        assert_eq!(res.body["category"]["name"], "Bundesliga");
        assert_eq!(res.body["images"], json!([]));
        assert_eq!(res.body["hashtags"], json!([]));
    }

    #[tokio::test]
    async fn creating_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ENTRIES, &entry_body("Anonymous", UNKNOWN_ID))
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;

        let res = app
            .post_with_token(routes::ENTRIES, &entry_body("  ", &category), &alice.token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let mut body = entry_body("Overconfident", &category);
        body["predictions"] = json!([{
            "homeTeam": "Bayern Munich",
            "awayTeam": "Borussia Dortmund",
            "predictedScore": "5-0",
            "matchDate": "2025-04-20T15:30:00Z",
            "confidence": 6
        }]);

        let res = app.post_with_token(routes::ENTRIES, &body, &alice.token).await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn same_title_is_unique_per_primary_author() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let body = entry_body("Title Race", &category);
        app.create_entry(&alice.token, &body).await;

        let duplicate = app.post_with_token(routes::ENTRIES, &body, &alice.token).await;
        assert_eq!(duplicate.status, 400);

        let other_author = app.post_with_token(routes::ENTRIES, &body, &bob.token).await;
        assert_eq!(other_author.status, 201);
    }

    #[tokio::test]
    async fn every_read_counts_one_view() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Viewed", &category))
            .await;

        let first = app.get_without_token(&routes::entry(&id)).await;
        let second = app.get_without_token(&routes::entry(&id)).await;

        assert_eq!(first.body["impressionCount"], 1);
        assert_eq!(second.body["impressionCount"], 2);
    }

    #[tokio::test]
    async fn reading_unknown_or_malformed_ids() {
        let app = TestApp::spawn().await;

        let missing = app.get_without_token(&routes::entry(UNKNOWN_ID)).await;
        assert_eq!(missing.status, 404);
        assert_eq!(missing.message(), "Blog entry not found");

        let malformed = app.get_without_token(&routes::entry("abc")).await;
        assert_eq!(malformed.status, 400);
    }

    #[tokio::test]
    async fn put_updates_and_records_an_edit() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Premier League").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Liverpool", &category))
            .await;
        app.get_without_token(&routes::entry(&id)).await;

        let mut body = entry_body("Liverpool's Title Chances", &category);
        body["commentsAllowed"] = json!(false);
        let res = app.put_with_token(&routes::entry(&id), &body, &alice.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Liverpool's Title Chances");
        assert_eq!(res.body["commentsAllowed"], false);
        assert_eq!(res.body["editDates"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["impressionCount"], 1);
    }

    #[tokio::test]
    async fn any_logged_in_user_may_update() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let category = app.create_category(&alice.token, "La Liga").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Barcelona", &category))
            .await;

        let res = app
            .put_with_token(
                &routes::entry(&id),
                &entry_body("Barcelona Rebuild", &category),
                &bob.token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["authors"][0]["username"], "alice");
    }

    #[tokio::test]
    async fn put_on_unknown_id_creates_the_entry() {
        let app = TestApp::spawn().await;
        let bob = app.register("bob").await;
        let category = app.create_category(&bob.token, "World Cup").await;

        let res = app
            .put_with_token(
                &routes::entry(UNKNOWN_ID),
                &entry_body("World Cup 2026", &category),
                &bob.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], UNKNOWN_ID);
        assert_eq!(res.body["authors"][0]["username"], "bob");
        assert_eq!(res.body["commentsAllowed"], true);

        let fetched = app.get_without_token(&routes::entry(UNKNOWN_ID)).await;
        assert_eq!(fetched.status, 200);
    }

    #[tokio::test]
    async fn delete_removes_the_entry_and_its_comments() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Short-lived", &category))
            .await;
        app.create_comment(&bob.token, &id, "First!").await;
        app.create_comment(&alice.token, &id, "Thanks").await;

        let res = app.delete_with_token(&routes::entry(&id), &alice.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            res.message(),
            "Blog entry and associated comments deleted successfully"
        );

        assert_eq!(app.get_without_token(&routes::entry(&id)).await.status, 404);
        let comments = app.get_without_token(&routes::entry_comments(&id)).await;
        assert_eq!(comments.body, json!([]));

        let again = app.delete_with_token(&routes::entry(&id), &alice.token).await;
        assert_eq!(again.status, 404);
    }
}

mod mutations {
    use super::*;

    #[tokio::test]
    async fn assigning_an_author_to_a_single_author_entry_replaces_them() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Handover", &category))
            .await;

        let res = app
            .patch_with_token(
                &routes::entry_authors(&id),
                &json!({ "authorId": bob.id }),
                &alice.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let authors = res.body["authors"].as_array().unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0]["username"], "bob");
        assert_eq!(res.body["editDates"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn assigning_checks_the_entry_before_the_author_id() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        let id = app
            .create_entry(&alice.token, &entry_body("Handover", &category))
            .await;

        let missing_entry = app
            .patch_with_token(
                &routes::entry_authors(UNKNOWN_ID),
                &json!({ "authorId": "garbage" }),
                &alice.token,
            )
            .await;
        assert_eq!(missing_entry.status, 404);

        let bad_author = app
            .patch_with_token(
                &routes::entry_authors(&id),
                &json!({ "authorId": "garbage" }),
                &alice.token,
            )
            .await;
        assert_eq!(bad_author.status, 400);
        assert_eq!(bad_author.message(), "Invalid author ID");
    }

    #[tokio::test]
    async fn hashtag_goes_on_the_newest_entry_once() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Champions League").await;
        let older = app
            .create_entry(&alice.token, &entry_body("Quarter Final", &category))
            .await;
        let newer = app
            .create_entry(&alice.token, &entry_body("Final", &category))
            .await;

        let first = app
            .patch_with_token(routes::LATEST_HASHTAG, &json!({ "hashtag": "#UCL" }), &alice.token)
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["id"], newer.as_str());
        assert_eq!(first.body["hashtags"], json!(["#UCL"]));
        assert_eq!(first.body["editDates"].as_array().unwrap().len(), 1);

        let repeat = app
            .patch_with_token(routes::LATEST_HASHTAG, &json!({ "hashtag": "#UCL" }), &alice.token)
            .await;
        assert_eq!(repeat.body["hashtags"], json!(["#UCL"]));
        assert_eq!(repeat.body["editDates"].as_array().unwrap().len(), 1);

        let untouched = app.get_without_token(&routes::entry(&older)).await;
        assert_eq!(untouched.body["hashtags"], json!([]));
    }

    #[tokio::test]
    async fn hashtag_needs_a_value_and_an_entry() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;

        let empty = app
            .patch_with_token(routes::LATEST_HASHTAG, &json!({ "hashtag": "" }), &alice.token)
            .await;
        assert_eq!(empty.status, 400);
        assert_eq!(empty.message(), "Hashtag is required");

        let no_entries = app
            .patch_with_token(routes::LATEST_HASHTAG, &json!({ "hashtag": "#x" }), &alice.token)
            .await;
        assert_eq!(no_entries.status, 404);
    }
}

mod listings {
    use super::*;

    #[tokio::test]
    async fn entries_by_user() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        app.create_entry(&alice.token, &entry_body("Alice 1", &category))
            .await;
        app.create_entry(&bob.token, &entry_body("Bob 1", &category))
            .await;

        let res = app.get_without_token(&routes::entries_by_user("alice")).await;
        assert_eq!(res.status, 200);
        let entries = res.body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["title"], "Alice 1");

        let unknown = app.get_without_token(&routes::entries_by_user("nobody")).await;
        assert_eq!(unknown.status, 404);
        assert_eq!(unknown.message(), "User not found");
    }

    #[tokio::test]
    async fn latest_two_and_second_oldest() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;
        app.create_entry(&alice.token, &entry_body("One", &category))
            .await;

        let lonely = app.get_without_token(routes::SECOND_OLDEST).await;
        assert_eq!(lonely.status, 404);
        assert_eq!(lonely.message(), "No blog entry found");

        app.create_entry(&alice.token, &entry_body("Two", &category))
            .await;
        app.create_entry(&alice.token, &entry_body("Three", &category))
            .await;

        let latest = app.get_without_token(routes::LATEST_TWO).await;
        let titles: Vec<&str> = latest
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Three", "Two"]);

        let second = app.get_without_token(routes::SECOND_OLDEST).await;
        assert_eq!(second.status, 200);
        assert_eq!(second.body["title"], "Two");
    }

    #[tokio::test]
    async fn content_based_listings() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;
        let category = app.create_category(&alice.token, "Bundesliga").await;

        let mut gallery = entry_body("Gallery", &category);
        gallery["images"] = json!([
            { "data": "data:image/png;base64,AAAA", "caption": "Stadium" },
            { "data": "data:image/png;base64,BBBB" }
        ]);
        app.create_entry(&alice.token, &gallery).await;

        let mut linked = entry_body("Linked", &category);
        linked["links"] = json!([{ "url": "https://www.bundesliga.com", "title": "Bundesliga" }]);
        app.create_entry(&alice.token, &linked).await;

        let mut echo = entry_body("Echo", &category);
        echo["content"] = json!("This post is called Echo.");
        app.create_entry(&alice.token, &echo).await;

        let images = app.get_without_token(routes::MULTIPLE_IMAGES).await;
        assert_eq!(images.body.as_array().unwrap().len(), 1);
        assert_eq!(images.body[0]["title"], "Gallery");

        let links = app.get_without_token(routes::RECENT_WITH_LINKS).await;
        assert_eq!(links.body.as_array().unwrap().len(), 1);
        assert_eq!(links.body[0]["title"], "Linked");

        let titled = app.get_without_token(routes::TITLE_IN_CONTENT).await;
        assert_eq!(titled.body.as_array().unwrap().len(), 1);
        assert_eq!(titled.body[0]["title"], "Echo");

        let all = app.get_without_token(routes::ENTRIES).await;
        assert_eq!(all.body.as_array().unwrap().len(), 3);
    }
}
