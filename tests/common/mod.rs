use rand::rngs::StdRng;
use rand::SeedableRng;
use task_draw::{build_router, AdminAccess, AppState, DrawConfig, DrawService, LocalStorage};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[allow(dead_code)]
    pub fn results_file(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.data_dir.path().join("results.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

/// Starts the server on an ephemeral port with the given list files.
pub async fn spawn_app(tasks: Option<&str>, participants: Option<&str>, access: AdminAccess) -> TestApp {
    let data_dir = TempDir::new().unwrap();
    if let Some(tasks) = tasks {
        std::fs::write(data_dir.path().join("tasks.txt"), tasks).unwrap();
    }
    if let Some(participants) = participants {
        std::fs::write(data_dir.path().join("participants.txt"), participants).unwrap();
    }

    let config = DrawConfig {
        data_dir: data_dir.path().to_str().unwrap().to_string(),
        admin_access: access,
        ..DrawConfig::default()
    };

    let storage = LocalStorage::new(config.data_dir.clone());
    let service = DrawService::with_rng(storage, &config, StdRng::seed_from_u64(2024));
    let app = build_router(AppState::new(service, None, config.admin_access.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        data_dir,
    }
}
