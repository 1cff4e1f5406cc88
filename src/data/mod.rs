pub mod loader;

pub use loader::{demo_catalog, DataContext, DataOrigin};
