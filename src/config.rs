// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session configuration.
//!
//! Settings come from an optional YAML file and are overridden by
//! command-line flags. They are read once at startup and never change.

use crate::editor::Session;
use crate::io::csrf::{cookie_value, DEFAULT_CSRF_COOKIE};
use crate::models::annotation::{DatasetId, ImageId};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("missing required setting `{0}`")]
    Missing(&'static str),
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "boxmark",
    about = "Draw and label bounding boxes on an image stored in a remote annotation store",
    version
)]
pub struct Args {
    /// YAML session file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the annotation store
    #[arg(short = 's', long = "server")]
    pub server_url: Option<String>,

    /// Store id of the image to annotate
    #[arg(short = 'i', long = "image-id")]
    pub image_id: Option<i64>,

    /// Store id of the dataset the image belongs to
    #[arg(short = 'd', long = "dataset-id")]
    pub dataset_id: Option<i64>,

    /// Local copy of the image to display
    #[arg(long = "image")]
    pub image_path: Option<PathBuf>,

    /// Cookie string sent with every request, e.g. "sessionid=...; csrftoken=..."
    #[arg(long = "cookies")]
    pub cookies: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub server_url: String,
    pub image_id: Option<i64>,
    pub dataset_id: Option<i64>,
    pub image_path: Option<PathBuf>,
    pub cookies: Option<String>,
    pub csrf_cookie_name: String,
    /// Used as-is instead of looking the token up in `cookies`.
    pub csrf_token: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            image_id: None,
            dataset_id: None,
            image_path: None,
            cookies: None,
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_token: None,
        }
    }
}

/// Settings checked and ready to use.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub session: Session,
    pub server_url: String,
    pub image_path: PathBuf,
    pub cookies: Option<String>,
    pub csrf_token: Option<String>,
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Load the file named by `--config` (if any) and apply flag overrides.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(url) = &args.server_url {
            self.server_url = url.clone();
        }
        if args.image_id.is_some() {
            self.image_id = args.image_id;
        }
        if args.dataset_id.is_some() {
            self.dataset_id = args.dataset_id;
        }
        if args.image_path.is_some() {
            self.image_path = args.image_path.clone();
        }
        if args.cookies.is_some() {
            self.cookies = args.cookies.clone();
        }
    }

    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Missing("server_url"));
        }
        let image = self.image_id.ok_or(ConfigError::Missing("image_id"))?;
        let dataset = self.dataset_id.ok_or(ConfigError::Missing("dataset_id"))?;
        let image_path = self.image_path.ok_or(ConfigError::Missing("image_path"))?;

        let csrf_token = self.csrf_token.or_else(|| {
            self.cookies
                .as_deref()
                .and_then(|cookies| cookie_value(cookies, &self.csrf_cookie_name))
        });
        if csrf_token.is_none() {
            log::warn!(
                "No `{}` cookie configured; saving and deleting will fail",
                self.csrf_cookie_name
            );
        }

        Ok(ResolvedConfig {
            session: Session {
                image: ImageId(image),
                dataset: DatasetId(dataset),
            },
            server_url: self.server_url,
            image_path,
            cookies: self.cookies,
            csrf_token,
        })
    }
}
