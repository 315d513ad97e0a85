pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod routes;
pub mod state;
pub mod user;
