mod activity;
mod callback_query;
mod playlist;
mod sessions;
mod tokens;

pub use activity::{most_recent_run, Activity, RunSummary};
pub use callback_query::CallbackQuery;
pub use playlist::{playlist_uris, NewPlaylist, Terrain, PLAYLIST_TRACKS};
pub use sessions::{ProviderTokens, Sessions};
pub use tokens::{SpotifyToken, StravaToken};
