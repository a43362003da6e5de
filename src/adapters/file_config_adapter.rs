//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive (`[Category.ENTER]` and
//! `[category.enter]` are the same section); values keep their case.

use crate::domain::error::ChartError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| ChartError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ChartError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ChartError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse<T>(&self, section: &str, key: &str, kind: &str) -> Result<Option<T>, String>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_string(section, key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| format!("'{raw}' is not {kind}: {e}"))
            })
            .transpose()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
        self.parse(section, key, "an integer")
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String> {
        self.parse(section, key, "a number")
    }
}
