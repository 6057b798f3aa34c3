use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod handlers;

use handlers::{catalog, health, players, predict};
use lineupcast::config::EngineConfig;
use lineupcast::core::LineupAggregator;
use lineupcast::data::{load_catalog, CatalogHandle};
use lineupcast::predictor::{FallbackPredictor, OnnxPredictor};

/// Application state shared across handlers
pub struct AppState {
    pub catalog: CatalogHandle,
    pub aggregator: LineupAggregator,
    pub predictor: Option<Mutex<OnnxPredictor>>,
    pub fallback: FallbackPredictor,
    pub data_dir: PathBuf,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    // Engine configuration; defaults apply when no file is given.
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => EngineConfig::load(&path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?,
        Err(_) => EngineConfig::default(),
    };

    info!("Loading catalog from {:?}", data_dir);
    let snapshot = load_catalog(&data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    info!(
        "Catalog loaded: {} players, {} chemistry edges",
        snapshot.player_count(),
        snapshot.edge_count()
    );

    let aggregator = LineupAggregator::new(config);

    // Schema version the model artifact was trained against; defaults to the
    // version this configuration produces.
    let model_schema = std::env::var("MODEL_SCHEMA_VERSION")
        .unwrap_or_else(|_| aggregator.schema_version().to_string());

    let predictor = match std::env::var("MODEL_PATH") {
        Ok(path) => match OnnxPredictor::new(&path, &model_schema) {
            Ok(p) => {
                info!("ONNX model loaded from {}", path);
                Some(Mutex::new(p))
            }
            Err(e) => {
                warn!("Failed to load ONNX model: {}. Using fallback predictor.", e);
                None
            }
        },
        Err(_) => {
            info!("MODEL_PATH not set, using fallback predictor");
            None
        }
    };

    let app_state = Arc::new(AppState {
        catalog: CatalogHandle::new(snapshot),
        aggregator,
        predictor,
        fallback: FallbackPredictor::new(),
        data_dir,
    });

    info!("Starting lineupcast API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/players", web::get().to(players::list_players))
            .route("/predict", web::post().to(predict::predict_match))
            .route("/catalog/reload", web::post().to(catalog::reload_catalog))
    })
    .bind(&addr)?
    .run()
    .await
}
