//! Superadmin tenant lifecycle

mod common;

use common::{TENANT_PASSWORD, app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn reserved_slug_is_rejected_on_create_and_update() {
    let app = app().await;
    let admin = app.admin().await;

    let res = app
        .post(
            "/api/admin/restaurants",
            json!({
                "slug": "restoranmaestroadmin",
                "name": "Impostor",
                "password": TENANT_PASSWORD,
            }),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 3102);

    let created = app.create_restaurant(&admin, "legitimo", json!({})).await;
    let id = created["id"].as_i64().unwrap();
    let res = app
        .patch(
            &format!("/api/admin/restaurants/{id}"),
            json!({"slug": "RestoranMaestroAdmin"}),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 3102);
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
    let app = app().await;
    let admin = app.admin().await;
    app.create_restaurant(&admin, "sushi-bar", json!({})).await;

    let res = app
        .post(
            "/api/admin/restaurants",
            json!({"slug": "sushi-bar", "name": "Otro", "password": TENANT_PASSWORD}),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.code(), 3101);
    assert_eq!(res.body["details"]["field"], "slug");

    let other = app.create_restaurant(&admin, "ramen-bar", json!({})).await;
    let id = other["id"].as_i64().unwrap();
    let res = app
        .patch(
            &format!("/api/admin/restaurants/{id}"),
            json!({"slug": "sushi-bar"}),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_create_payloads() {
    let app = app().await;
    let admin = app.admin().await;

    let cases = [
        json!({"slug": "ab", "name": "Corto", "password": TENANT_PASSWORD}),
        json!({"slug": "con espacios", "name": "X", "password": TENANT_PASSWORD}),
        json!({"slug": "valido", "name": "", "password": TENANT_PASSWORD}),
        json!({"slug": "valido", "name": "X", "password": "123"}),
        json!({"slug": "valido", "name": "X", "password": TENANT_PASSWORD, "currency_code": "ZZZ"}),
        json!({
            "slug": "valido",
            "name": "X",
            "password": TENANT_PASSWORD,
            "timezone": "Marte/Olympus",
        }),
    ];
    for body in cases {
        let res = app.post("/api/admin/restaurants", body.clone(), Some(&admin)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "accepted {body}");
    }
}

#[tokio::test]
async fn tenant_cannot_use_admin_routes() {
    let app = app().await;
    let admin = app.admin().await;
    let tenant = app.tenant(&admin, "curioso", json!({})).await;

    let res = app.get("/api/admin/restaurants", Some(&tenant)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2003);

    let res = app.get("/api/admin/restaurants", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn soft_delete_keeps_row_and_revokes_sessions() {
    let app = app().await;
    let admin = app.admin().await;
    let created = app.create_restaurant(&admin, "cierra-pronto", json!({})).await;
    let id = created["id"].as_i64().unwrap();
    let tenant = app.login("cierra-pronto", TENANT_PASSWORD).await;

    let res = app.delete(&format!("/api/admin/restaurants/{id}"), Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["status"], "cancelled");

    let res = app.get("/api/admin/restaurants", Some(&admin)).await;
    let listed = res.body.as_array().unwrap();
    assert!(listed.iter().any(|r| r["slug"] == "cierra-pronto" && r["status"] == "cancelled"));
    assert!(listed.iter().all(|r| r.get("hashed_password").is_none()));

    let res = app.get("/api/auth/session", Some(&tenant)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/restaurants/cierra-pronto/menu", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_change_revokes_sessions_and_new_password_works() {
    let app = app().await;
    let admin = app.admin().await;
    let created = app.create_restaurant(&admin, "nueva-clave", json!({})).await;
    let id = created["id"].as_i64().unwrap();
    let old = app.login("nueva-clave", TENANT_PASSWORD).await;

    let res = app
        .patch(
            &format!("/api/admin/restaurants/{id}"),
            json!({"password": "otra-clave-mas"}),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app.get("/api/auth/session", Some(&old)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    assert_eq!(
        app.try_login("nueva-clave", TENANT_PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
    app.login("nueva-clave", "otra-clave-mas").await;
}

#[tokio::test]
async fn slug_change_moves_menu_and_logo() {
    let app = app().await;
    let admin = app.admin().await;
    let created = app.create_restaurant(&admin, "antiguo", json!({})).await;
    let id = created["id"].as_i64().unwrap();
    let tenant = app.login("antiguo", TENANT_PASSWORD).await;

    let res = app
        .post(
            "/api/restaurants/antiguo/logo",
            json!({"image": common::png_data_url()}),
            Some(&tenant),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .patch(
            &format!("/api/admin/restaurants/{id}"),
            json!({"slug": "renovado"}),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["slug"], "renovado");

    assert_eq!(
        app.get("/api/restaurants/antiguo/menu", None).await.status,
        StatusCode::NOT_FOUND
    );
    let res = app.get("/api/restaurants/renovado/theme", None).await;
    let logo = res.body["logo"].as_str().unwrap().to_owned();
    assert!(logo.starts_with("/api/images/renovado/logo-"));
    assert_eq!(app.get(&logo, None).await.status, StatusCode::OK);
}
