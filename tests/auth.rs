#![cfg(feature = "inmem-store")]

mod common;

use actix_web::test;
use common::{body_json, seeded_repo, verbose_app, FailingRepo, TOKEN};
use serde_json::json;
use std::sync::Arc;

const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/api/folders"),
    ("POST", "/api/folders"),
    ("GET", "/api/folders/1"),
    ("PATCH", "/api/folders/1"),
    ("DELETE", "/api/folders/1"),
    ("GET", "/api/notes"),
    ("POST", "/api/notes"),
    ("GET", "/api/notes/1"),
    ("PATCH", "/api/notes/1"),
    ("DELETE", "/api/notes/1"),
];

fn request(method: &str, uri: &str) -> test::TestRequest {
    let req = match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PATCH" => test::TestRequest::patch(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unexpected method {other}"),
    };
    req.uri(uri).set_json(&json!({"name": "x", "folder_id": 1, "content": "c"}))
}

#[actix_web::test]
async fn every_route_rejects_missing_token() {
    // a failing store proves no resource logic ran: it would have produced a 500
    let app = verbose_app(Arc::new(FailingRepo)).await;
    for (method, uri) in ROUTES {
        let resp = test::call_service(&app, request(method, uri).to_request()).await;
        assert_eq!(resp.status(), 401, "{method} {uri}");
        assert_eq!(body_json(resp).await, json!({"error": "Unauthorized request"}));
    }
}

#[actix_web::test]
async fn wrong_or_malformed_credentials_are_rejected() {
    let app = verbose_app(Arc::new(FailingRepo)).await;
    let headers = [
        format!("Bearer {TOKEN}x"),
        format!("bearer{TOKEN}"),
        format!("Basic {TOKEN}"),
        TOKEN.to_string(),
        "Bearer ".to_string(),
    ];
    for value in headers {
        for (method, uri) in ROUTES {
            let req = request(method, uri).insert_header(("Authorization", value.clone())).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401, "{method} {uri} with '{value}'");
        }
    }
}

#[actix_web::test]
async fn matching_token_passes_through() {
    let app = verbose_app(Arc::new(seeded_repo().await)).await;

    let req = test::TestRequest::get().uri("/").insert_header(common::bearer()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(test::read_body(resp).await, "Hello, world!");

    let req = test::TestRequest::get().uri("/api/folders/1").insert_header(common::bearer()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
