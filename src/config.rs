use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::schema::DatasetSchema;

pub const CONFIG_FILE_NAME: &str = "dashboard.toml";
pub const ENV_PREFIX: &str = "SALES_DASH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub orders: DatasetSchema,
    pub cart: DatasetSchema,
    /// Length of the product rankings in the cart section.
    pub top_k_products: usize,
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            orders: DatasetSchema::orders(),
            cart: DatasetSchema::cart(),
            top_k_products: 10,
            recent_limit: 8,
        }
    }
}

impl DashboardConfig {
    pub fn schema(&self, kind: DatasetKind) -> &DatasetSchema {
        match kind {
            DatasetKind::Orders => &self.orders,
            DatasetKind::Cart => &self.cart,
        }
    }

    /// Defaults, then `file` when it exists, then `SALES_DASH__*` environment variables
    /// (for example `SALES_DASH__ORDERS__TOP_N=6`).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&DashboardConfig::default())
            .context("failed to serialize default config")?;
        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let loaded: DashboardConfig = builder
            .build()
            .context("failed to read dashboard config")?
            .try_deserialize()
            .context("invalid dashboard config")?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<()> {
        for kind in [DatasetKind::Orders, DatasetKind::Cart] {
            let schema = self.schema(kind);
            if schema.date_field.trim().is_empty() {
                anyhow::bail!("{kind} schema: date_field must not be empty");
            }
            if schema.date_format.trim().is_empty() {
                anyhow::bail!("{kind} schema: date_format must not be empty");
            }
        }
        if self.orders.amount_field.is_none() {
            anyhow::bail!("orders schema: amount_field is required");
        }
        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "sales-dash")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("preferences.sqlite"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
