//! HTTP surface: public pages, session cookies and role-guarded areas.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod session;
