/// Typed custom-property values and the capability to resolve them.

use glam::Vec4;
use super::ids::DataId;

/// Value of a provider property, as far as attribute lookup cares
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    FloatArray(Vec<f32>),
    /// Any other type (strings, pointers, int arrays, ...)
    Other,
}

impl PropertyValue {
    /// Convert to an attribute vector.
    ///
    /// Scalars broadcast to xyz with w = 1; float arrays of up to four
    /// elements fill the leading components over (0, 0, 0, 1). Everything
    /// else is unsupported.
    pub fn to_vec4(&self) -> Option<Vec4> {
        match self {
            PropertyValue::Float(value) => Some(Vec4::new(*value, *value, *value, 1.0)),
            PropertyValue::Int(value) => {
                let value = *value as f32;
                Some(Vec4::new(value, value, value, 1.0))
            }
            PropertyValue::FloatArray(values) if values.len() <= 4 => {
                let mut out = [0.0, 0.0, 0.0, 1.0];
                out[..values.len()].copy_from_slice(values);
                Some(Vec4::from_array(out))
            }
            PropertyValue::FloatArray(_) | PropertyValue::Other => None,
        }
    }
}

/// Resolves a property path on a provider data-block.
///
/// Custom properties are addressed as `["name"]`, built-in ones by their
/// plain name.
pub trait PropertyResolver {
    fn resolve(&self, id: DataId, path: &str) -> Option<PropertyValue>;
}

/// Look up a property as an attribute vector
pub fn lookup_property<R: PropertyResolver + ?Sized>(resolver: &R, id: DataId, path: &str) -> Option<Vec4> {
    resolver.resolve(id, path)?.to_vec4()
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;
