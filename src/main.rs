mod cli;
mod commands;
mod config;
mod constants;
mod error;
mod models;
mod server;
mod services;
mod utils;
mod worker;

#[tokio::main]
async fn main() {
    cli::run().await;
}
