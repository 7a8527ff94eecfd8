use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Public-looking host the test client maps to the local server.
/// Keeps the SSRF validator in the loop without special-casing loopback.
#[allow(dead_code)]
pub const TEST_HOST: &str = "site.test";

#[allow(dead_code)]
pub const PERFECT_HTML: &str = include_str!("../static/perfect.html");
#[allow(dead_code)]
pub const NEGLECTED_HTML: &str = include_str!("../static/neglected.html");

/// Starts a local server with pages, redirects, and a slow endpoint.
#[allow(dead_code)]
pub async fn start_test_server() -> SocketAddr {
    let http_server = HttpServer::new(|| {
        App::new()
            .route(
                "/perfect",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .body(PERFECT_HTML)
                }),
            )
            .route(
                "/neglected",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .body(NEGLECTED_HTML)
                }),
            )
            .route(
                "/user-agent",
                web::get().to(|req: HttpRequest| async move {
                    let agent = req
                        .headers()
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string();
                    HttpResponse::Ok().body(format!("<title>{}</title>", agent))
                }),
            )
            .route(
                "/missing",
                web::get().to(|| async {
                    HttpResponse::NotFound().body("<html><title>Not Found</title></html>")
                }),
            )
            .route(
                "/redirect-relative",
                web::get().to(|| async {
                    HttpResponse::MovedPermanently()
                        .append_header(("Location", "/perfect"))
                        .finish()
                }),
            )
            .route(
                "/redirect-private",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "http://10.0.0.1/admin"))
                        .finish()
                }),
            )
            .route(
                "/redirect-metadata",
                web::get().to(|| async {
                    HttpResponse::TemporaryRedirect()
                        .append_header(("Location", "http://169.254.169.254/latest/meta-data/"))
                        .finish()
                }),
            )
            .route(
                "/loop",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/loop"))
                        .finish()
                }),
            )
            .route(
                "/slow",
                web::get().to(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    HttpResponse::Ok().body(PERFECT_HTML)
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    addr
}

/// URL on the test server as seen through [`TEST_HOST`].
#[allow(dead_code)]
pub fn site_url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}:{}{}", TEST_HOST, addr.port(), path)
}

/// Client that resolves [`TEST_HOST`] to the local server and never follows redirects.
#[allow(dead_code)]
pub fn test_client(addr: SocketAddr) -> Client {
    Client::builder()
        .resolve(TEST_HOST, addr)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(seo_health::http_client::USER_AGENT)
        .build()
        .expect("Failed to build test client")
}

/// Resolver that refuses every name the way the private-address guard does.
#[allow(dead_code)]
pub struct RefusingResolver;

impl reqwest::dns::Resolve for RefusingResolver {
    fn resolve(&self, name: reqwest::dns::Name) -> reqwest::dns::Resolving {
        let host = name.as_str().to_string();
        Box::pin(async move {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("'{}' resolves only to private or reserved addresses", host),
            )) as Box<dyn std::error::Error + Send + Sync>)
        })
    }
}

/// Client whose every DNS lookup is refused. Never touches the network.
#[allow(dead_code)]
pub fn refusing_client() -> Client {
    Client::builder()
        .dns_resolver(Arc::new(RefusingResolver))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build refusing client")
}
