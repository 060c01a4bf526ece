//! WorldWise — visited-city tracker core.
//!
//! DESIGN
//! ======
//! `RemoteCityStore` mirrors the server-held city list, `AuthSession` holds
//! the single-user login state, and `RouteGuard` gates protected content on
//! that state. The three only meet in the host (the CLI in `main.rs`).

pub mod auth;
pub mod backend;
pub mod cities;
pub mod config;
pub mod guard;
