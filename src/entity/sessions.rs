use crate::providers::Provider;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Provider tokens linked to one browser identity.
#[derive(Debug, Default, Clone)]
pub struct ProviderTokens {
    pub spotify: Option<String>,
    pub strava: Option<String>,
}

impl ProviderTokens {
    pub fn get(&self, provider: Provider) -> Option<&String> {
        match provider {
            Provider::Spotify => self.spotify.as_ref(),
            Provider::Strava => self.strava.as_ref(),
        }
    }

    fn set(&mut self, provider: Provider, token: String) {
        match provider {
            Provider::Spotify => self.spotify = Some(token),
            Provider::Strava => self.strava = Some(token),
        }
    }
}

struct SessionEntry {
    tokens: ProviderTokens,
    last_seen: Instant,
}

/// Server-side token store keyed by the identity cookie.
///
/// Entries idle for longer than `ttl` are treated as absent and pruned on
/// the next write.
pub struct Sessions {
    map: HashMap<String, SessionEntry>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Sessions {
            map: HashMap::new(),
            ttl,
        }
    }

    fn is_live(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) < self.ttl
    }

    pub fn tokens(&mut self, id: &str) -> Option<ProviderTokens> {
        let now = Instant::now();
        let live = self.map.get(id).map(|entry| self.is_live(entry, now))?;
        if !live {
            self.map.remove(id);
            return None;
        }
        let entry = self.map.get_mut(id)?;
        entry.last_seen = now;
        Some(entry.tokens.clone())
    }

    pub fn token(&mut self, id: &str, provider: Provider) -> Option<String> {
        self.tokens(id)?.get(provider).cloned()
    }

    pub fn store(&mut self, id: String, provider: Provider, token: String) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.map
            .retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
        let entry = self.map.entry(id).or_insert_with(|| SessionEntry {
            tokens: ProviderTokens::default(),
            last_seen: now,
        });
        entry.tokens.set(provider, token);
        entry.last_seen = now;
    }

    pub fn remove(&mut self, id: &str) -> Option<ProviderTokens> {
        self.map.remove(id).map(|entry| entry.tokens)
    }
}
