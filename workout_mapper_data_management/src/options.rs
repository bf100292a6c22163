use std::path::{Path, PathBuf};

use clap::Args;

pub const DEFAULT_DATA_DIRECTORY: &str = "App_Data";
pub const DEFAULT_DATABASE_FILE_NAME: &str = "tracks.db";

/// Where track files are read from and where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationOptions {
    pub data_directory: PathBuf,
    pub database_file_name: String,
    pub google_maps_api_key: String,
}

impl Default for ApplicationOptions {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            database_file_name: DEFAULT_DATABASE_FILE_NAME.to_string(),
            google_maps_api_key: String::new(),
        }
    }
}

impl ApplicationOptions {
    /// Makes the data directory absolute against `content_root`, fills in defaults for
    /// empty values and creates the data directory if it does not exist.
    pub fn resolve(mut self, content_root: &Path) -> std::io::Result<Self> {
        if self.data_directory.as_os_str().is_empty() {
            self.data_directory = content_root.join(DEFAULT_DATA_DIRECTORY);
        } else if self.data_directory.is_relative() {
            self.data_directory = content_root.join(&self.data_directory);
        }

        if self.database_file_name.is_empty() {
            self.database_file_name = DEFAULT_DATABASE_FILE_NAME.to_string();
        }

        std::fs::create_dir_all(&self.data_directory)?;

        Ok(self)
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_directory.join(&self.database_file_name)
    }
}

/// Command line and environment configuration shared by the binaries.
#[derive(Debug, Clone, Args)]
pub struct OptionsArgs {
    /// Directory containing the GPX files and the database
    #[arg(long, env = "DATA_DIRECTORY", default_value = DEFAULT_DATA_DIRECTORY)]
    pub data_directory: PathBuf,

    /// Name of the database file inside the data directory
    #[arg(long, env = "DATABASE_FILE_NAME", default_value = DEFAULT_DATABASE_FILE_NAME)]
    pub database_file_name: String,

    /// Google Maps API key handed to the front end
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", default_value = "", hide_env_values = true)]
    pub google_maps_api_key: String,
}

impl OptionsArgs {
    pub fn resolve(self, content_root: &Path) -> std::io::Result<ApplicationOptions> {
        ApplicationOptions {
            data_directory: self.data_directory,
            database_file_name: self.database_file_name,
            google_maps_api_key: self.google_maps_api_key,
        }
        .resolve(content_root)
    }
}
