//! Helpers shared by the configuration structs.
//!
//! [`with_field_fn!`](crate::with_field_fn) generates a builder-style
//! `with_<field>` method.

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Loads a serde-deserializable configuration from a JSON reader.
pub fn config_from_json<T, R>(reader: R) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    R: std::io::Read, {
    Ok(serde_json::from_reader(reader)?)
}
