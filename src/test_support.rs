use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use actix_web::cookie::Cookie;
use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

#[derive(Debug, Clone)]
pub struct FakeClubSiteConfig {
    pub login_page_status: u16,
    pub login_page_body: String,
    pub login_status: u16,
    pub visits_status: u16,
    pub visits_body: String,
}

impl Default for FakeClubSiteConfig {
    fn default() -> Self {
        Self {
            login_page_status: 200,
            login_page_body: r#"<html><body>
<form action="/Account/Login" method="post">
  <input name="__RequestVerificationToken" type="hidden" value="fake-token-123" />
  <input id="Username" name="Username" type="text" />
  <input id="Password" name="Password" type="password" />
</form>
</body></html>"#
                .to_string(),
            login_status: 200,
            visits_status: 200,
            visits_body: r#"[
  {"CheckInDate":"2026-02-01T18:00:00","ClubName":"Downtown"},
  {"CheckInDate":"2026-03-14T06:30:00","ClubName":"Downtown"}
]"#
            .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub cookies: String,
}

#[derive(Clone)]
struct SiteState {
    config: FakeClubSiteConfig,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// In-process stand-in for ourclublogin.com, served on an ephemeral local port.
pub struct FakeClubSite {
    addr: SocketAddr,
    handle: ServerHandle,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl FakeClubSite {
    pub fn start(config: FakeClubSiteConfig) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = SiteState {
            config,
            requests: Arc::clone(&requests),
        };
        let (ready_tx, ready_rx) = mpsc::channel();

        thread::spawn(move || {
            actix_web::rt::System::new().block_on(async move {
                let server = HttpServer::new(move || {
                    App::new()
                        .app_data(web::Data::new(state.clone()))
                        .route("/Account/Login", web::get().to(login_page))
                        .route("/Account/Login", web::post().to(login))
                        .route("/Checkin/GetCustomerVisits", web::post().to(customer_visits))
                })
                .workers(1)
                .bind(("127.0.0.1", 0))
                .expect("fake site should bind");

                let addr = server.addrs()[0];
                let server = server.run();
                ready_tx
                    .send((addr, server.handle()))
                    .expect("test should wait for fake site");
                server.await
            })
        });

        let (addr, handle) = ready_rx.recv().expect("fake site should start");

        Self {
            addr,
            handle,
            requests,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests
            .lock()
            .expect("request log lock should be available")
            .clone()
    }
}

impl Drop for FakeClubSite {
    fn drop(&mut self) {
        let _ = self.handle.stop(false);
    }
}

fn record(
    state: &SiteState,
    req: &HttpRequest,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
) {
    let cookies = req
        .headers()
        .get(actix_web::http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    state
        .requests
        .lock()
        .expect("request log lock should be available")
        .push(ReceivedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query,
            form,
            cookies,
        });
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("fake site status should be valid")
}

fn session_cookie(name: &'static str, value: &'static str) -> Cookie<'static> {
    Cookie::build(name, value).path("/").http_only(true).finish()
}

async fn login_page(
    state: web::Data<SiteState>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    record(&state, &req, query.into_inner(), HashMap::new());

    HttpResponse::build(status(state.config.login_page_status))
        .cookie(session_cookie(".AspNetCore.Antiforgery", "antiforgery-cookie"))
        .content_type("text/html; charset=utf-8")
        .body(state.config.login_page_body.clone())
}

async fn login(
    state: web::Data<SiteState>,
    req: HttpRequest,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    record(&state, &req, HashMap::new(), form.into_inner());

    HttpResponse::build(status(state.config.login_status))
        .cookie(session_cookie(".ASPXAUTH", "member-session"))
        .content_type("text/html; charset=utf-8")
        .body("<html><body>Welcome</body></html>")
}

async fn customer_visits(
    state: web::Data<SiteState>,
    req: HttpRequest,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    record(&state, &req, HashMap::new(), form.into_inner());

    HttpResponse::build(status(state.config.visits_status))
        .content_type("application/json; charset=utf-8")
        .body(state.config.visits_body.clone())
}
