pub mod app;
pub mod dashboard;
pub mod dataset;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod series;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use dashboard::Dashboard;
pub use state::AppState;
pub use storage::load_dashboard;
