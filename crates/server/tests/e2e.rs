mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::spawn_app;

#[tokio::test]
async fn e2e_public_health() {
    let app = spawn_app(None).await;
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["status"], "ok");
    app.cleanup().await;
}

#[tokio::test]
async fn home_renders_default_copy_and_structured_data() {
    let app = spawn_app(None).await;
    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Чистота и свежесть вашего дома"));
    assert!(res.body.contains("Почему выбирают нас"));
    assert!(res.body.contains("12+"));
    assert!(res.body.contains(r#""@type":"LocalBusiness""#));
    assert!(res.body.contains(r#""@type":"WebSite""#));
    // edit mode is off: no inline affordances
    assert!(!res.body.contains("/inline/activate"));
    app.cleanup().await;
}

#[tokio::test]
async fn api_lists_active_records_in_sort_order() {
    let app = spawn_app(None).await;
    for (title, order, active) in [("Окна", 2, true), ("Квартира", 1, true), ("Архив", 0, false)] {
        let res = app
            .json(Method::POST, "/api/services", json!({"title": title, "price": "от 1 000 ₽", "sort_order": order, "is_active": active}))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    }

    let active = app.get("/api/services").await.json();
    let titles: Vec<&str> = active.as_array().unwrap().iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Квартира", "Окна"]);

    let all = app.get("/api/services?all=true").await.json();
    let titles: Vec<&str> = all.as_array().unwrap().iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Архив", "Квартира", "Окна"]);
    app.cleanup().await;
}

#[tokio::test]
async fn api_update_and_delete_are_visible_on_next_read() {
    let app = spawn_app(None).await;
    let created = app
        .json(Method::POST, "/api/features", json!({"title": "Гарантия", "description": "Переделаем"}))
        .await
        .json();
    assert_eq!(created["icon"], "Shield");
    let id = created["id"].as_str().unwrap().to_string();

    // warm the cache first
    assert_eq!(app.get("/api/features").await.json().as_array().unwrap().len(), 1);

    let res = app.json(Method::PATCH, &format!("/api/features/{id}"), json!({"title": "Гарантия качества"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.get("/api/features").await.json()[0]["title"], "Гарантия качества");
    assert_eq!(app.get("/api/features?all=true").await.json()[0]["description"], "Переделаем");

    let res = app.json(Method::DELETE, &format!("/api/features/{id}"), json!(null)).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(app.get("/api/features?all=true").await.json().as_array().unwrap().is_empty());

    let res = app.json(Method::DELETE, &format!("/api/features/{id}"), json!(null)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.json(Method::PATCH, &format!("/api/features/{id}"), json!({"title": "x"})).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    app.cleanup().await;
}

#[tokio::test]
async fn content_blocks_merge_fields() {
    let app = spawn_app(None).await;
    assert_eq!(app.get("/api/content/hero").await.status, StatusCode::NOT_FOUND);

    let res = app.json(Method::PUT, "/api/content/hero", json!({"title": "Блеск"})).await;
    assert_eq!(res.status, StatusCode::OK);
    app.json(Method::PUT, "/api/content/hero", json!({"subtitle": "Донецк"})).await;

    let block = app.get("/api/content/hero").await.json();
    assert_eq!(block["content"], json!({"title": "Блеск", "subtitle": "Донецк"}));

    let home = app.get("/").await;
    assert!(home.body.contains("Блеск"));
    // missing field falls back to the built-in copy
    assert!(home.body.contains("Доверьте уборку профессионалам"));
    app.cleanup().await;
}

#[tokio::test]
async fn services_page_groups_by_category() {
    let app = spawn_app(None).await;
    app.json(Method::POST, "/api/services", json!({"title": "Мойка окон", "price": "от 500 ₽", "category": "windows"})).await;
    app.json(Method::POST, "/api/services", json!({"title": "Генеральная уборка", "price": "от 2 500 ₽"})).await;

    let res = app.get("/services").await;
    assert_eq!(res.status, StatusCode::OK);
    let cleaning = res.body.find("Услуги уборки").unwrap();
    let windows = res.body.find("Услуги мойки окон").unwrap();
    assert!(cleaning < windows);
    assert!(!res.body.contains("Услуги химчистки"));
    assert!(res.body.contains(r#""@type":"ItemList""#));
    assert!(res.body.contains(r#""price":"2500""#));
    app.cleanup().await;
}

#[tokio::test]
async fn service_detail_and_not_found() {
    let app = spawn_app(None).await;
    let live = app
        .json(Method::POST, "/api/services", json!({"title": "Химчистка дивана", "description": "Коротко", "category": "dry_cleaning"}))
        .await
        .json();
    let hidden = app
        .json(Method::POST, "/api/services", json!({"title": "Старое", "is_active": false}))
        .await
        .json();

    let res = app.get(&format!("/services/{}", live["id"].as_str().unwrap())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Химчистка дивана"));
    assert!(res.body.contains(r#""@type":"BreadcrumbList""#));
    // no full description: the short one is shown instead
    assert!(res.body.contains("Коротко"));

    for path in [format!("/services/{}", hidden["id"].as_str().unwrap()), "/services/not-a-uuid".to_string()] {
        let res = app.get(&path).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.contains("Услуга не найдена"));
        assert!(res.body.contains("Вернуться к услугам"));
    }
    app.cleanup().await;
}

#[tokio::test]
async fn lead_relay_preflight_has_cors_headers_and_no_body() {
    let app = spawn_app(Some("test-token")).await;
    let req = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/functions/send-telegram")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.send(req).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["access-control-allow-origin"], "*");
    assert_eq!(res.headers["access-control-allow-headers"], "authorization, x-client-info, apikey, content-type");
    assert!(res.body.is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn lead_relay_delivers_without_message_line() {
    let app = spawn_app(Some("test-token")).await;
    let res = app
        .json(Method::POST, "/functions/send-telegram", json!({"name": "Иван", "phone": "+79001234567"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"success": true}));
    assert_eq!(res.headers["access-control-allow-origin"], "*");

    let sent = app.messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "-2001547391");
    assert!(sent[0].1.contains("Иван"));
    assert!(sent[0].1.contains("+79001234567"));
    assert!(!sent[0].1.contains("Сообщение"));
    app.cleanup().await;
}

#[tokio::test]
async fn lead_relay_rejects_missing_fields_without_sending() {
    let app = spawn_app(Some("test-token")).await;
    let res = app
        .json(Method::POST, "/functions/send-telegram", json!({"name": "  ", "phone": "+79001234567"}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Имя и телефон обязательны");
    assert!(app.messenger.sent().is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn lead_relay_without_token_is_a_generic_server_error() {
    let app = spawn_app(None).await;
    let res = app
        .json(Method::POST, "/functions/send-telegram", json!({"name": "Иван", "phone": "+79001234567"}))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json()["error"], "Внутренняя ошибка сервера");
    assert!(!res.body.contains("TELEGRAM"));
    assert!(app.messenger.sent().is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn lead_relay_upstream_failure_is_500() {
    let app = spawn_app(Some("test-token")).await;
    *app.messenger.reject.lock().unwrap() = Some("Bad Request: chat not found".into());
    let res = app
        .json(Method::POST, "/functions/send-telegram", json!({"name": "Иван", "phone": "+79001234567"}))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!res.body.contains("chat not found"));
    app.cleanup().await;
}

#[tokio::test]
async fn contact_form_redirects_on_success_and_keeps_input_on_failure() {
    let app = spawn_app(Some("test-token")).await;
    let res = app
        .post_form("/contact", &[("name", "Мария"), ("phone", "+79490000000"), ("message", "Нужна уборка")])
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location.as_deref(), Some("/?notice=lead_sent#contacts"));
    assert!(app.messenger.sent()[0].1.contains("Нужна уборка"));

    let page = app.get("/?notice=lead_sent").await;
    assert!(page.body.contains("Заявка отправлена!"));

    let res = app.post_form("/contact", &[("name", "Мария"), ("phone", ""), ("message", "Окна")]).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.contains(r#"value="Мария""#));
    assert!(res.body.contains("Имя и телефон обязательны"));
    assert_eq!(app.messenger.sent().len(), 1);
    app.cleanup().await;
}

#[tokio::test]
async fn contact_form_delivery_failure_suggests_calling() {
    let app = spawn_app(None).await;
    let res = app.post_form("/contact", &[("name", "Мария"), ("phone", "+79490000000")]).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.body.contains("Попробуйте позвонить нам напрямую"));
    assert!(res.body.contains(r#"value="+79490000000""#));
    app.cleanup().await;
}

#[tokio::test]
async fn uploads_enforce_format_and_size() {
    let app = spawn_app(None).await;

    let res = app.post_multipart("/api/uploads", "photo.heic", "image/heic", b"heic").await;
    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(res.json()["error"], "Формат HEIC не поддерживается");

    let big = vec![0u8; 6 * 1024 * 1024];
    let res = app.post_multipart("/api/uploads", "big.png", "image/png", &big).await;
    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json()["error"], "Файл слишком большой");

    let res = app.post_multipart("/api/uploads", "doc.pdf", "application/pdf", b"%PDF").await;
    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let photo = vec![7u8; 2 * 1024 * 1024];
    let res = app.post_multipart("/api/uploads", "kitchen.jpg", "image/jpeg", &photo).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let url = res.json()["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/storage/images/services/"));
    assert!(url.ends_with(".jpg"));

    let served = app.get(&url).await;
    assert_eq!(served.status, StatusCode::OK);
    app.cleanup().await;
}

#[tokio::test]
async fn upload_extension_follows_the_declared_image_type() {
    let app = spawn_app(None).await;

    let res = app.post_multipart("/api/uploads", "evil.html", "image/png", b"<script>alert(1)</script>").await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let url = res.json()["url"].as_str().unwrap().to_string();
    assert!(url.ends_with(".png"), "{url}");

    let served = app.get(&url).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.headers[axum::http::header::CONTENT_TYPE], "image/png");
    app.cleanup().await;
}
