pub mod playlist;
pub mod providers;
pub mod recommender;

pub use playlist::{AddOutcome, JsonFilePlaylistStore, PlaylistService, PlaylistStore};
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommender::Recommender;
