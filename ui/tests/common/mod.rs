use egui_kittest::Harness;
use rendezvous_ui::RendezvousApp;
use rendezvous_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a, T = RendezvousApp> {
    _mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }
}

impl<'a> TestCtx<'a, RendezvousApp> {
    /// App against a server that accepts every login.
    pub async fn new_app() -> Self {
        Self::new_app_with_login(200, serde_json::json!({"token": "test-token"})).await
    }

    /// App against a server answering logins with `status` and `body`.
    pub async fn new_app_with_login(status: u16, body: serde_json::Value) -> Self {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/account/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&mock_server)
            .await;

        let state = State::test(mock_server.uri());
        let app = RendezvousApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }
}
