use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Flat,
    Uphill,
    Downhill,
}

/// Tracks appended to every generated playlist, in order.
pub const PLAYLIST_TRACKS: [(Terrain, &str); 7] = [
    (Terrain::Flat, "spotify:track:0VjIjW4GlUZAMYd2vXMi3b"),
    (Terrain::Flat, "spotify:track:3n3Ppam7vgaVa1iaRUc9Lp"),
    (Terrain::Flat, "spotify:track:7qiZfU4dY1lWllzX7mPBI3"),
    (Terrain::Uphill, "spotify:track:2KH16WveTQWT6KOG9Rg6e2"),
    (Terrain::Uphill, "spotify:track:5ghIJDpPoe3CfHMGu71E6T"),
    (Terrain::Downhill, "spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
    (Terrain::Downhill, "spotify:track:0nrRP2bk19rLc0orkWPQk2"),
];

pub fn playlist_uris() -> Vec<String> {
    PLAYLIST_TRACKS
        .iter()
        .map(|(_, uri)| uri.to_string())
        .collect()
}

#[derive(Serialize, Debug)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub public: bool,
}

impl Default for NewPlaylist {
    fn default() -> Self {
        NewPlaylist {
            name: "Runner's High Custom Playlist".to_string(),
            description: "Made for your route & pace!".to_string(),
            public: false,
        }
    }
}
