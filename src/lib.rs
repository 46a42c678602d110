pub mod app;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod loads;
pub mod mock;
pub mod models;
pub mod navigation;
pub mod render;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod toast;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use gateway::{Gateway, HttpGateway};
pub use mock::MockGateway;
pub use state::AppState;
pub use storage::DurableStore;
