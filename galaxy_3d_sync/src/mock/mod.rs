//! Test doubles for the external collaborators
//!
//! Used by the crate's own tests and by integration tests; hosts can use
//! them to exercise a `SceneSync` without a real scene graph.

mod mock_converter;
mod mock_provider;

pub use mock_converter::{ConversionRecord, MockGeometryConverter};
pub use mock_provider::MockSceneProvider;
