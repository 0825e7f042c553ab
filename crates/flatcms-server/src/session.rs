//! Cookie-keyed, in-memory sessions.
//!
//! A session carries the signed-in identity, a single flash-message slot,
//! and the duplicate counters for the documents copied during the session.
//! Handlers never see the store directly; the [`session_layer`] middleware
//! hands each request a [`SessionHandle`].
//!
//! Sessions are created lazily: a request that only reads (a listing, a
//! health check) leaves the store untouched and gets no cookie. Signing in
//! or out moves the session to a fresh id, so an id seen before sign-in is
//! worthless afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use flatcms_store::DuplicateCounter;
use flatcms_types::SessionIdentity;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Idle time after which a session is forgotten.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Everything remembered about one client between requests.
#[derive(Clone, Debug, Default)]
pub struct SessionData {
    pub identity: SessionIdentity,
    pub flash: Option<String>,
    pub duplicates: DuplicateCounter,
}

struct Entry {
    data: SessionData,
    last_seen: Instant,
}

impl Entry {
    fn new(data: SessionData) -> Self {
        Self {
            data,
            last_seen: Instant::now(),
        }
    }
}

/// All live sessions, keyed by the id in the session cookie.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Store `data` under a new id and return the id.
    pub fn create(&self, data: SessionData) -> Uuid {
        let mut map = self.sessions.write().expect("lock poisoned");
        self.prune(&mut map);
        let id = Uuid::new_v4();
        map.insert(id, Entry::new(data));
        debug!(session = %id, "session started");
        id
    }

    /// Whether `id` names a live session.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions
            .read()
            .expect("lock poisoned")
            .get(id)
            .is_some_and(|entry| !self.expired(entry))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every idle session and return how many were removed.
    pub fn prune_idle(&self) -> usize {
        let mut map = self.sessions.write().expect("lock poisoned");
        self.prune(&mut map)
    }

    fn expired(&self, entry: &Entry) -> bool {
        entry.last_seen.elapsed() > self.idle_timeout
    }

    fn prune(&self, map: &mut HashMap<Uuid, Entry>) -> usize {
        let before = map.len();
        map.retain(|_, entry| !self.expired(entry));
        let removed = before - map.len();
        if removed > 0 {
            debug!(removed, "idle sessions pruned");
        }
        removed
    }

    /// Run `f` against the live session `id`, marking it as seen.
    fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut SessionData) -> R) -> Option<R> {
        let mut map = self.sessions.write().expect("lock poisoned");
        if self.expired(map.get(id)?) {
            map.remove(id);
            return None;
        }
        let entry = map.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(f(&mut entry.data))
    }

    /// Run `f` against `id` if it is live, otherwise against a new session.
    fn upsert<R>(&self, id: Option<Uuid>, f: impl FnOnce(&mut SessionData) -> R) -> (Uuid, R) {
        let mut map = self.sessions.write().expect("lock poisoned");
        let live = id.filter(|id| map.get(id).is_some_and(|entry| !self.expired(entry)));
        let id = match live {
            Some(id) => id,
            None => {
                self.prune(&mut map);
                let id = Uuid::new_v4();
                debug!(session = %id, "session started");
                id
            }
        };
        let entry = map
            .entry(id)
            .or_insert_with(|| Entry::new(SessionData::default()));
        entry.last_seen = Instant::now();
        (id, f(&mut entry.data))
    }

    /// Remove `id` and return its data, if it was live.
    fn take(&self, id: &Uuid) -> Option<SessionData> {
        let entry = self.sessions.write().expect("lock poisoned").remove(id)?;
        (!self.expired(&entry)).then_some(entry.data)
    }
}

/// A request's view onto its session.
///
/// Clones share the current id, so a session started or rotated by a
/// handler is visible to the middleware that issues the cookie.
#[derive(Clone)]
pub struct SessionHandle {
    id: Arc<Mutex<Option<Uuid>>>,
    store: Arc<SessionStore>,
}

impl SessionHandle {
    /// A handle onto session `id`, or onto no session yet.
    pub fn new(id: Option<Uuid>, store: Arc<SessionStore>) -> Self {
        Self {
            id: Arc::new(Mutex::new(id)),
            store,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        *self.id.lock().expect("lock poisoned")
    }

    fn read<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> Option<R> {
        let id = self.id()?;
        self.store.update(&id, f)
    }

    /// Apply `f` to the session, starting one if there is none.
    fn write<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut slot = self.id.lock().expect("lock poisoned");
        let (id, out) = self.store.upsert(*slot, f);
        *slot = Some(id);
        out
    }

    /// Move the session to a fresh id after applying `f`.
    fn rotate(&self, f: impl FnOnce(&mut SessionData)) {
        let mut slot = self.id.lock().expect("lock poisoned");
        let mut data = slot
            .and_then(|id| self.store.take(&id))
            .unwrap_or_default();
        f(&mut data);
        *slot = Some(self.store.create(data));
    }

    pub fn identity(&self) -> SessionIdentity {
        self.read(|s| s.identity.clone()).unwrap_or_default()
    }

    pub fn sign_in(&self, username: &str) {
        self.rotate(|s| s.identity = SessionIdentity::signed_in(username));
    }

    /// Forget the identity and every duplicate counter.
    pub fn sign_out(&self) {
        self.rotate(|s| {
            s.identity = SessionIdentity::anonymous();
            s.duplicates.clear();
        });
    }

    /// Set the message shown on the next rendered page, replacing any unread one.
    pub fn flash(&self, message: impl Into<String>) {
        let message = message.into();
        self.write(|s| s.flash = Some(message));
    }

    /// Take the pending message, clearing the slot.
    pub fn take_flash(&self) -> Option<String> {
        self.read(|s| s.flash.take()).flatten()
    }

    pub fn duplicates(&self) -> DuplicateCounter {
        self.read(|s| s.duplicates.clone()).unwrap_or_default()
    }

    pub fn set_duplicates(&self, counter: DuplicateCounter) {
        self.write(|s| s.duplicates = counter);
    }
}

/// Middleware: resolve the caller's session.
///
/// When the handler started a session or moved it to a new id, the
/// response sets the cookie.
pub async fn session_layer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let known = cookie_value(request.headers(), &state.cookie_name)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .filter(|id| state.sessions.contains(id));

    let handle = SessionHandle::new(known, state.sessions.clone());
    request.extensions_mut().insert(handle.clone());
    let mut response = next.run(request).await;

    match handle.id() {
        Some(id) if Some(id) != known => {
            let cookie = format!("{}={id}; Path=/; HttpOnly; SameSite=Lax", state.cookie_name);
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "session cookie is not a valid header value"),
            }
        }
        _ => {}
    }
    response
}

/// Find `name` among the request's cookies.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
