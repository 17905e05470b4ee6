//! Login gateway: credential checks throttled by a [`LockoutTracker`].

pub mod config;
pub mod gateway;
pub mod logging;
pub mod service;
pub mod store;

pub use config::{ConfigError, GatewayConfig};
pub use gateway::{AuthGateway, LoginError};
pub use lockout_tracker::{LockoutPolicy, LockoutTracker};
pub use service::UserService;
pub use store::{MemoryUserStore, StoreError, User, UserStore};
