pub mod metadata;
pub mod providers;
pub mod recommender;
pub mod retry;
pub mod session;

pub use metadata::MetadataClient;
pub use recommender::Recommender;
pub use session::{SessionController, SessionPhase, SessionState};
