#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod config;
mod domain;
mod format;
mod infra;
mod platform;
mod ui;
mod usecase;


use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{default_config_path, default_webview_data_dir, DashboardConfig};

fn load_config() -> DashboardConfig {
    let path = match default_config_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warn!(error = %err, "config directory unavailable, using environment only");
            None
        }
    };
    match DashboardConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let detail = format!("{err:#}");
            warn!(error = %detail, "invalid configuration, using defaults");
            DashboardConfig::default()
        }
    }
}

fn main() {
    platform::desktop::console::attach_parent_console();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "sales_dash=info".into()),
        )
        .init();

    let config = load_config();
    info!(
        orders_top_n = config.orders.top_n,
        cart_top_n = config.cart.top_n,
        top_k_products = config.top_k_products,
        "starting sales dashboard"
    );

    let mut desktop_cfg = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Sales dashboard"));
    match default_webview_data_dir() {
        Ok(dir) => desktop_cfg = desktop_cfg.with_data_directory(dir),
        Err(err) => {
            let detail = format!("{err:#}");
            warn!(error = %detail, "webview data directory unavailable");
        }
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(Arc::new(config))
        .launch(app::App);
}
