use serde_json::json;

use crate::common::{routes, TestApp};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_gets_a_token_and_profile_without_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "alice",
                    "firstName": "Alice",
                    "lastName": "Liddell",
                    "email": "alice@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["user"]["username"], "alice");
        assert_eq!(res.body["user"]["firstName"], "Alice");
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_an_already_taken_username() {
        let app = TestApp::spawn().await;
        app.register("alice").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "alice",
                    "firstName": "Other",
                    "lastName": "Alice",
                    "email": "other@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.message(), "User already exists");
    }

    #[tokio::test]
    async fn cannot_register_an_already_taken_email() {
        let app = TestApp::spawn().await;
        app.register("alice").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "bob",
                    "firstName": "Bob",
                    "lastName": "Builder",
                    "email": "alice@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({ "username": "alice", "password": "securepass" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(res.body["message"].is_string());
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "username": "alice", "password": "password123" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["id"], alice.id.as_str());
        assert!(res.body["token"].is_string());
    }

    #[tokio::test]
    async fn padded_username_logs_in_with_the_same_input() {
        let app = TestApp::spawn().await;
        let registered = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": " carol ",
                    "firstName": "Carol",
                    "lastName": "Danvers",
                    "email": "carol@example.com",
                    "password": "pw",
                }),
            )
            .await;
        assert_eq!(registered.status, 201, "{}", registered.text);
        assert_eq!(registered.body["user"]["username"], "carol");

        let same_input = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "username": " carol ", "password": "pw" }),
            )
            .await;
        assert_eq!(same_input.status, 200, "{}", same_input.text);
        assert_eq!(same_input.body["user"]["id"], registered.body["user"]["id"]);

        let stored_form = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "username": "carol", "password": "pw" }),
            )
            .await;
        assert_eq!(stored_form.status, 200);
    }

    #[tokio::test]
    async fn email_is_stored_as_given() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "dave",
                    "firstName": "Dave",
                    "lastName": "Lister",
                    "email": "dave-at-red-dwarf",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["email"], "dave-at-red-dwarf");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let app = TestApp::spawn().await;
        app.register("alice").await;

        let wrong_password = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "username": "alice", "password": "nope" }),
            )
            .await;
        let unknown_user = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "username": "mallory", "password": "password123" }),
            )
            .await;

        assert_eq!(wrong_password.status, 400);
        assert_eq!(unknown_user.status, 400);
        assert_eq!(wrong_password.message(), "Invalid credentials");
        assert_eq!(wrong_password.message(), unknown_user.message());
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_owner() {
        let app = TestApp::spawn().await;
        let alice = app.register("alice").await;

        let res = app.get_with_token(routes::ME, &alice.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn me_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert!(res.body["message"].is_string());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn user_list_is_sorted_by_username() {
        let app = TestApp::spawn().await;
        app.register("charlie").await;
        app.register("alice").await;
        app.register("bob").await;

        let res = app.get_without_token(routes::USERS).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["alice", "bob", "charlie"]);
        assert!(res.body[0].get("password").is_none());
    }
}
