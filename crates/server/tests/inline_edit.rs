mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use service::inline_edit::FieldView;
use support::spawn_app;

const HERO_TITLE: &str = "Чистота и свежесть вашего дома";

#[tokio::test]
async fn toggle_shows_and_hides_edit_affordances() {
    let app = spawn_app(None).await;
    let res = app.post_form("/edit-mode", &[("return_to", "/services")]).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location.as_deref(), Some("/services"));
    assert!(app.state.edit_mode_on());
    assert!(app.get("/").await.body.contains(r#"action="/inline/activate""#));

    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    assert!(!app.state.edit_mode_on());
    assert!(!app.get("/").await.body.contains("/inline/activate"));
    app.cleanup().await;
}

#[tokio::test]
async fn foreign_return_targets_are_ignored() {
    let app = spawn_app(None).await;
    let res = app.post_form("/edit-mode", &[("return_to", "//evil.example")]).await;
    assert_eq!(res.location.as_deref(), Some("/"));
    app.cleanup().await;
}

#[tokio::test]
async fn activate_is_refused_while_edit_mode_is_off() {
    let app = spawn_app(None).await;
    let res = app
        .post_form("/inline/activate", &[("binding", "content:hero:title"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/?notice=edit_locked"));
    assert!(!app.get("/").await.body.contains("/inline/commit"));
    app.cleanup().await;
}

#[tokio::test]
async fn commit_saves_block_field_and_shows_new_value() {
    let app = spawn_app(None).await;
    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    app.post_form("/inline/activate", &[("binding", "content:hero:title"), ("return_to", "/")]).await;

    let page = app.get("/").await.body;
    assert!(page.contains(r#"action="/inline/commit""#));
    assert!(page.contains(&format!(r#"name="value" value="{HERO_TITLE}""#)));

    let res = app
        .post_form("/inline/commit", &[("binding", "content:hero:title"), ("value", "Блеск и порядок"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/?notice=saved"));

    let page = app.get("/").await.body;
    assert!(page.contains("Блеск и порядок"));
    assert!(!page.contains(r#"action="/inline/commit""#));
    let block = app.get("/api/content/hero").await.json();
    assert_eq!(block["content"]["title"], "Блеск и порядок");
    app.cleanup().await;
}

#[tokio::test]
async fn turning_edit_mode_off_discards_open_editor() {
    let app = spawn_app(None).await;
    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    app.post_form("/inline/activate", &[("binding", "content:hero:title"), ("return_to", "/")]).await;

    // edit mode off while the field is open
    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    let page = app.get("/").await.body;
    assert!(page.contains(HERO_TITLE));
    assert!(!page.contains("/inline/commit"));

    // a late commit is not applied
    let res = app
        .post_form("/inline/commit", &[("binding", "content:hero:title"), ("value", "Поздно"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/?notice=edit_locked"));
    assert_eq!(app.get("/api/content/hero").await.status, StatusCode::NOT_FOUND);

    // back on, the field starts in display state
    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    assert!(!app.get("/").await.body.contains("/inline/commit"));
    app.cleanup().await;
}

#[tokio::test]
async fn cancel_closes_editor_without_saving() {
    let app = spawn_app(None).await;
    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    app.post_form("/inline/activate", &[("binding", "content:footer:description"), ("return_to", "/")]).await;
    assert!(app.get("/").await.body.contains(r#"name="value" rows="4""#));

    let res = app
        .post_form("/inline/cancel", &[("binding", "content:footer:description"), ("value", "черновик"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/"));
    let page = app.get("/").await.body;
    assert!(!page.contains("черновик"));
    assert_eq!(app.get("/api/content/footer").await.status, StatusCode::NOT_FOUND);
    app.cleanup().await;
}

#[tokio::test]
async fn record_fields_commit_through_their_collection() {
    let app = spawn_app(None).await;
    let created = app
        .json(Method::POST, "/api/services", json!({"title": "Мойка окон", "price": "от 500 ₽"}))
        .await
        .json();
    let binding = format!("services:{}:price", created["id"].as_str().unwrap());

    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    app.post_form("/inline/activate", &[("binding", binding.as_str()), ("return_to", "/")]).await;
    let res = app
        .post_form("/inline/commit", &[("binding", binding.as_str()), ("value", "от 700 ₽"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/?notice=saved"));
    assert_eq!(app.get("/api/services").await.json()[0]["price"], "от 700 ₽");
    app.cleanup().await;
}

#[tokio::test]
async fn failed_save_keeps_the_draft_open() {
    let app = spawn_app(None).await;
    let created = app
        .json(Method::POST, "/api/features", json!({"title": "Гарантия", "description": "Переделаем"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();
    let binding = format!("features:{id}:title");

    app.post_form("/edit-mode", &[("return_to", "/")]).await;
    app.post_form("/inline/activate", &[("binding", binding.as_str()), ("return_to", "/")]).await;
    // the record disappears before the commit lands
    app.json(Method::DELETE, &format!("/api/features/{id}"), json!(null)).await;

    let res = app
        .post_form("/inline/commit", &[("binding", binding.as_str()), ("value", "Гарантия 100%"), ("return_to", "/")])
        .await;
    assert_eq!(res.location.as_deref(), Some("/?notice=save_failed"));
    let session = &app.state.edit;
    let field = session.snapshot(&binding.parse().unwrap(), "Гарантия");
    assert!(field.is_editing());
    // the shown value stays the stored one, the rejected input lives on as the draft
    assert_eq!(field.value(), "Гарантия");
    assert_eq!(field.view(true), FieldView::Editing("Гарантия 100%"));
    app.cleanup().await;
}
