mod auth;
mod config;
mod helpers;
mod server;
