use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const BUNDLE_FILE: &str = "delivery_time.json";

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bundle_path: PathBuf,
    pub port: u16,
    /// `LOG_PRED=1`: log the encoded feature vector of every request.
    pub log_predictions: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let bundle_path = get("BUNDLE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(resolve_bundle_path);
        let port = get("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let log_predictions = get("LOG_PRED").as_deref() == Some("1");

        Self {
            bundle_path,
            port,
            log_predictions,
        }
    }
}

fn bundle_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(BUNDLE_FILE),
        PathBuf::from("artifacts").join(BUNDLE_FILE),
    ];
    if let Ok(mut p) = std::env::current_exe() {
        p.pop(); // exe dir
        p.push(BUNDLE_FILE);
        candidates.push(p);
    }
    candidates
}

/// First candidate that exists; otherwise the CWD-relative default, which
/// then fails loudly at load time.
fn resolve_bundle_path() -> PathBuf {
    bundle_candidates()
        .into_iter()
        .find(|c| c.exists())
        .unwrap_or_else(|| PathBuf::from(BUNDLE_FILE))
}
