//! Kinde Session — client-side OAuth2/OIDC session engine
//!
//! Spiritual port of Kinde's js-utils session core to Rust. Maintains an
//! authentication session across heterogeneous host environments: a pluggable
//! session-store abstraction (with transparent chunking for size-constrained
//! backends), an authorization-code exchange flow, and a self-rescheduling
//! refresh-token rotation flow.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kinde_session::prelude::*;
//!
//! # async fn example() -> kinde_session::error::Result<()> {
//! let manager = SessionManager::new();
//! manager.set_active_storage(Arc::new(MemoryStore::new()));
//!
//! let params = ExchangeParams::builder()
//!     .url_params(vec![
//!         ("state".to_string(), "abc".to_string()),
//!         ("code".to_string(), "xyz".to_string()),
//!     ])
//!     .domain("https://myapp.kinde.com")
//!     .client_id("client-id")
//!     .redirect_url("https://myapp.example/callback")
//!     .auto_refresh(true)
//!     .build();
//! let tokens = manager.exchange_authorization_code(params).await?;
//! println!("{}", tokens.access_token);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flows;
pub mod manager;
pub mod prelude;
pub mod storage;
pub mod util;
