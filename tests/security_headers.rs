use actix_web::{http::header, test, web, App, HttpResponse};
use noteful::{AppConfig, Environment, SecurityHeaders};

async fn ok() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_web::test]
async fn test_security_headers_present() {
    let app = test::init_service(App::new().wrap(SecurityHeaders::new()).route("/", web::get().to(ok))).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert_eq!(headers.get("content-security-policy").unwrap(), "default-src 'none'; frame-ancestors 'none'");
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cross-origin-resource-policy").unwrap(), "same-origin");
    assert!(headers.get("strict-transport-security").is_none()); // not enabled
}

#[actix_web::test]
async fn test_hsts_follows_config() {
    let mut cfg = AppConfig::new("token", Environment::Production);
    cfg.enable_hsts = true;
    let app = test::init_service(
        App::new().wrap(SecurityHeaders::from_config(&cfg)).route("/", web::get().to(ok)),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.headers().get("strict-transport-security").is_some(), "HSTS header missing");
}

#[actix_web::test]
async fn test_headers_on_error_responses() {
    let app = test::init_service(App::new().wrap(SecurityHeaders::new()).route("/", web::get().to(ok))).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
}

// existing CSP header should not be overwritten by middleware
#[actix_web::test]
async fn test_existing_csp_header_preserved() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::new())
            .route("/custom", web::get().to(|| async {
                HttpResponse::Ok()
                    .insert_header((header::CONTENT_SECURITY_POLICY, "custom-src 'none'"))
                    .finish()
            })),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/custom").to_request()).await;
    let csp = resp.headers().get("content-security-policy").unwrap().to_str().unwrap();
    assert_eq!(csp, "custom-src 'none'");
}
