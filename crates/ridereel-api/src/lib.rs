pub mod auth;
pub mod checkout;
pub mod error;
pub mod events;
pub mod imports;
pub mod middleware;
pub mod purchases;
pub mod riders;
pub mod routes;
pub mod state;
pub mod stats;

pub use routes::router;
pub use state::{AppState, AppStateInner};
