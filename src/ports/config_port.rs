//! Configuration access port trait.
//!
//! Missing keys are `Ok(None)`. A key that is present but does not parse as
//! the requested type is `Err` with the reason; `domain::settings` turns
//! that into a config error naming the key.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String>;
}
