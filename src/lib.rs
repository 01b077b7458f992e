//! SHELF Application Library
//!
//! Wires the book collection modules into the kernel registry and runs the
//! HTTP server on top of them.

pub mod modules;

use shelf_kernel::settings::Settings;
use shelf_kernel::{InitCtx, ModuleRegistry};

/// Run the service until the HTTP server exits.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    shelf_http::start_server(&registry, &settings).await?;

    registry.stop_all().await
}
