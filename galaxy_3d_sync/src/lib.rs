/*!
# Galaxy 3D Sync

Scene synchronization core for the Galaxy 3D renderer.

This crate turns the instance stream of an external scene graph into a
long-lived render scene, re-using render entities across syncs and only
re-deriving what changed. Motion blur is realized by re-running the sync
at each required shutter time.

## Architecture

- **SceneProvider**: Host-implemented read access to the scene graph
- **GeometryConverter**: Host-implemented mesh, hair and volume conversion
- **IdentityCache**: Stable keys to long-lived render entities
- **GeometryDispatcher**: Worker pool for geometry conversion jobs
- **SceneSync**: Full and motion-only synchronization passes
- **RenderScene**: Objects, geometries, lights, particles and procedurals

Hosts implement the provider and converter traits; everything else is
owned by a `SceneSync`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod provider;
pub mod scene;
pub mod sync;
pub mod mock;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Sync driver and its configuration
    pub use crate::config::{CullingConfig, MotionPosition, MotionType, SyncConfig, ViewportConfig};
    pub use crate::sync::{SceneSync, SyncProgress, SyncReport};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Provider sub-module
    pub mod provider {
        pub use crate::provider::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
