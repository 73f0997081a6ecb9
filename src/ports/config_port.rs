//! Read access to projection settings, keyed by section and key.

pub trait ConfigPort {
    /// The raw value, or `None` when the key is absent or blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Falls back to `default` when the value is absent or not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
