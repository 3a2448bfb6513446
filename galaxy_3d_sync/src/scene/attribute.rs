/// Attribute requests and per-object attribute values.

use glam::Vec4;

/// Attributes with a fixed meaning, requested by shading graphs without a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardAttribute {
    /// Generated texture coordinates
    Generated,
    /// Default UV map
    Uv,
    /// Particle info (index, age, lifetime, ...)
    Particle,
    /// Per-step vertex positions for deformation blur
    MotionVertexPosition,
}

/// One attribute a shading graph needs at render time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeRequest {
    /// Attribute looked up by name (`object:`/`instancer:` prefixes select
    /// per-object properties, anything else is a geometry attribute)
    Named(String),
    Standard(StandardAttribute),
}

/// Deduplicated set of attribute requests of a geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeRequestSet {
    requests: Vec<AttributeRequest>,
}

impl AttributeRequestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request, ignoring duplicates
    pub fn add(&mut self, request: AttributeRequest) {
        if !self.requests.contains(&request) {
            self.requests.push(request);
        }
    }

    /// Add every request of `other`
    pub fn add_all(&mut self, other: impl IntoIterator<Item = AttributeRequest>) {
        for request in other {
            self.add(request);
        }
    }

    /// Whether a named attribute is requested
    pub fn find(&self, name: &str) -> bool {
        self.requests
            .iter()
            .any(|request| matches!(request, AttributeRequest::Named(n) if n == name))
    }

    /// Whether a standard attribute is requested
    pub fn find_standard(&self, std: StandardAttribute) -> bool {
        self.requests.contains(&AttributeRequest::Standard(std))
    }

    /// Names of the named requests, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().filter_map(|request| match request {
            AttributeRequest::Named(name) => Some(name.as_str()),
            AttributeRequest::Standard(_) => None,
        })
    }

    pub fn requests(&self) -> &[AttributeRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Resolved value of a per-object attribute
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue {
    /// Full request name, prefix included
    pub name: String,
    pub value: Vec4,
}

impl ParamValue {
    pub fn new(name: &str, value: Vec4) -> Self {
        Self { name: name.to_string(), value }
    }

    /// Raw bytes of the value, used for change detection
    pub fn bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.value)
    }
}
