use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, mpsc},
    time::{Duration, Instant},
};

use crate::{
    assets::decode::{self, DecodedImage, FontFace},
    assets::fonts::SystemFonts,
    assets::icons::IconId,
    assets::source::{ResourceFetcher, ResourceSource},
    composition::model::{FontRole, PosterSpec},
    foundation::error::{PosterError, PosterResult},
};

/// Pixel size icons are rasterized at; rows draw them 1:1.
pub const ICON_SIZE_PX: u32 = 24;

/// Slot a resource occupies. One live entry per role; a new source for the same role replaces
/// the previous entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceRole {
    Background,
    Clipart,
    Font(FontRole),
    Icon(IconId),
}

impl ResourceRole {
    fn is_font(self) -> bool {
        matches!(self, ResourceRole::Font(_))
    }
}

/// Where a request's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequestSource {
    External(ResourceSource),
    BuiltinIcon(IconId),
}

impl RequestSource {
    fn label(&self) -> String {
        match self {
            RequestSource::External(s) => s.label(),
            RequestSource::BuiltinIcon(id) => format!("builtin:{}", id.name()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    pub role: ResourceRole,
    pub source: RequestSource,
}

impl ResourceRequest {
    pub fn new(role: ResourceRole, source: ResourceSource) -> Self {
        Self {
            role,
            source: RequestSource::External(source),
        }
    }

    pub fn icon(id: IconId) -> Self {
        Self {
            role: ResourceRole::Icon(id),
            source: RequestSource::BuiltinIcon(id),
        }
    }
}

/// A successfully decoded resource.
#[derive(Clone, Debug)]
pub enum Resource {
    Image(Arc<DecodedImage>),
    Font(Arc<FontFace>),
}

/// Observable lifecycle of a role's current entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Bounded waits per resource kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoaderTimeouts {
    pub image: Duration,
    pub font: Duration,
}

impl Default for LoaderTimeouts {
    fn default() -> Self {
        Self {
            image: Duration::from_secs(10),
            font: Duration::from_secs(3),
        }
    }
}

enum EntryState {
    Pending { waiters: Vec<mpsc::Sender<u64>> },
    Ready(Resource),
    // Message kept so cache hits can report why the resource is missing.
    Failed(String),
}

struct Entry {
    source: RequestSource,
    ticket: u64,
    state: EntryState,
}

struct Shared {
    fetcher: Arc<dyn ResourceFetcher>,
    entries: Mutex<HashMap<ResourceRole, Entry>>,
}

/// Session-scoped, role-keyed resource cache with concurrent, deadline-bounded loads.
///
/// Each resource is loaded once per source and cached for the lifetime of the loader. Failures
/// and timeouts are cached too; a failed resource is not retried until its role is given a
/// different source. Fetches run on their own threads and decoding on the rayon pool; callers
/// block on an `mpsc` barrier with a per-request deadline.
#[derive(Clone)]
pub struct ResourceLoader {
    shared: Arc<Shared>,
    next_ticket: Arc<std::sync::atomic::AtomicU64>,
}

impl std::fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLoader").finish_non_exhaustive()
    }
}

impl ResourceLoader {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                entries: Mutex::new(HashMap::new()),
            }),
            next_ticket: Arc::new(std::sync::atomic::AtomicU64::new(1)),
        }
    }

    /// Current state of the entry held for `role`, if any.
    pub fn state(&self, role: ResourceRole) -> Option<LoadState> {
        let entries = self.shared.entries.lock().ok()?;
        entries.get(&role).map(|e| match e.state {
            EntryState::Pending { .. } => LoadState::Pending,
            EntryState::Ready(_) => LoadState::Ready,
            EntryState::Failed(_) => LoadState::Failed,
        })
    }

    /// Load one resource, waiting at most `timeout`.
    pub fn load(&self, request: ResourceRequest, timeout: Duration) -> PosterResult<Resource> {
        let role = request.role;
        let mut out = self.load_all(vec![request], LoaderTimeouts {
            image: timeout,
            font: timeout,
        })?;
        out.remove(&role)
            .unwrap_or_else(|| Err(PosterError::evaluation("loader dropped a request")))
    }

    /// Issue every request concurrently and block until each has settled or hit its deadline.
    ///
    /// Returns one result per role. Per-resource failures are values, never the outer error;
    /// the outer error only reports a broken loader.
    #[tracing::instrument(level = "debug", skip_all, fields(requests = requests.len()))]
    pub fn load_all(
        &self,
        requests: Vec<ResourceRequest>,
        timeouts: LoaderTimeouts,
    ) -> PosterResult<BTreeMap<ResourceRole, PosterResult<Resource>>> {
        let started = Instant::now();
        let (tx, rx) = mpsc::channel::<u64>();
        // ticket -> (role, deadline)
        let mut waiting = HashMap::<u64, (ResourceRole, Instant)>::new();
        let mut out = BTreeMap::new();

        {
            let mut entries = self.lock_entries()?;
            for req in requests {
                let deadline = started
                    + if req.role.is_font() {
                        timeouts.font
                    } else {
                        timeouts.image
                    };

                let cached = entries
                    .get_mut(&req.role)
                    .filter(|entry| entry.source == req.source);
                if let Some(entry) = cached {
                    match &mut entry.state {
                        EntryState::Ready(r) => {
                            out.insert(req.role, Ok(r.clone()));
                        }
                        EntryState::Failed(msg) => {
                            out.insert(req.role, Err(PosterError::resource(msg.clone())));
                        }
                        EntryState::Pending { waiters } => {
                            waiters.push(tx.clone());
                            waiting.insert(entry.ticket, (req.role, deadline));
                        }
                    }
                    continue;
                }

                let ticket = self
                    .next_ticket
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let replaced = entries.insert(
                    req.role,
                    Entry {
                        source: req.source.clone(),
                        ticket,
                        state: EntryState::Pending {
                            waiters: vec![tx.clone()],
                        },
                    },
                );
                if replaced.is_some() {
                    tracing::debug!(role = ?req.role, "replacing superseded resource entry");
                }
                waiting.insert(ticket, (req.role, deadline));
                self.spawn_load(req, ticket);
            }
        }
        drop(tx);

        while !waiting.is_empty() {
            let now = Instant::now();
            let next_deadline = waiting
                .values()
                .map(|(_, d)| *d)
                .min()
                .unwrap_or(now);

            let settled = if next_deadline > now {
                match rx.recv_timeout(next_deadline - now) {
                    Ok(ticket) => Some(ticket),
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Every entry we waited on was replaced by a newer source.
                        let entries = self.lock_entries()?;
                        for (ticket, (role, _)) in waiting.drain() {
                            out.insert(role, settled_result(&entries, role, ticket));
                        }
                        break;
                    }
                }
            } else {
                None
            };

            let mut entries = self.lock_entries()?;
            if let Some(ticket) = settled {
                if let Some((role, _)) = waiting.remove(&ticket) {
                    out.insert(role, settled_result(&entries, role, ticket));
                }
                continue;
            }

            // Deadline reached: every expired request is cached as a timeout failure.
            let now = Instant::now();
            let expired: Vec<u64> = waiting
                .iter()
                .filter(|(_, (_, d))| *d <= now)
                .map(|(t, _)| *t)
                .collect();
            for ticket in expired {
                let Some((role, _)) = waiting.remove(&ticket) else {
                    continue;
                };
                match entries.get_mut(&role) {
                    Some(entry)
                        if entry.ticket == ticket
                            && matches!(entry.state, EntryState::Pending { .. }) =>
                    {
                        let msg = format!(
                            "{} did not settle within {:?}",
                            entry.source.label(),
                            started.elapsed()
                        );
                        tracing::warn!(role = ?role, "{msg}");
                        entry.state = EntryState::Failed(msg.clone());
                        out.insert(role, Err(PosterError::timeout(msg)));
                    }
                    _ => {
                        out.insert(role, settled_result(&entries, role, ticket));
                    }
                }
            }
        }

        Ok(out)
    }

    /// Resolve everything `spec` references into a [`PreparedResources`] set.
    ///
    /// Fallbacks: a missing background or clipart is `None`; a custom font that fails falls
    /// back to the role's system family; icons that fail are left out of the map.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn prepare(
        &self,
        spec: &PosterSpec,
        system_fonts: &SystemFonts,
        timeouts: LoaderTimeouts,
    ) -> PosterResult<PreparedResources> {
        let mut requests = Vec::new();
        if let Some(bg) = &spec.background {
            requests.push(ResourceRequest::new(ResourceRole::Background, bg.clone()));
        }
        if let Some(clip) = &spec.clipart {
            requests.push(ResourceRequest::new(
                ResourceRole::Clipart,
                clip.source.clone(),
            ));
        }
        for role in FontRole::ALL {
            if let Some(src) = spec.custom_fonts.get(role) {
                requests.push(ResourceRequest::new(ResourceRole::Font(role), src.clone()));
            }
        }
        let mut icons: Vec<IconId> = spec
            .social_row
            .items
            .iter()
            .chain(spec.place_row.items.iter())
            .filter(|i| !i.label.trim().is_empty())
            .map(|i| i.icon)
            .collect();
        icons.sort();
        icons.dedup();
        requests.extend(icons.into_iter().map(ResourceRequest::icon));

        let mut settled = self.load_all(requests, timeouts)?;
        let mut prepared = PreparedResources::default();

        match settled.remove(&ResourceRole::Background) {
            Some(Ok(Resource::Image(img))) => prepared.background = Some(img),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "background unavailable, using template fill");
            }
            _ => {}
        }
        match settled.remove(&ResourceRole::Clipart) {
            Some(Ok(Resource::Image(img))) => prepared.clipart = Some(img),
            Some(Err(e)) => tracing::warn!(error = %e, "clipart unavailable, omitting"),
            _ => {}
        }

        // Roles that name the same system family at the same weight share one face.
        let mut system_faces: BTreeMap<(&str, bool), Option<Arc<FontFace>>> = BTreeMap::new();
        for role in FontRole::ALL {
            let custom = match settled.remove(&ResourceRole::Font(role)) {
                Some(Ok(Resource::Font(face))) => Some(face),
                Some(Err(e)) => {
                    tracing::warn!(role = role.name(), error = %e, "custom font unavailable, using system family");
                    None
                }
                _ => None,
            };
            let face = match custom {
                Some(face) => Some(face),
                None => system_faces
                    .entry((spec.fonts.get(role), role.is_bold()))
                    .or_insert_with_key(|(family, bold)| {
                        system_fonts.resolve(family, *bold).map(Arc::new)
                    })
                    .clone(),
            };
            match face {
                Some(face) => {
                    prepared.fonts.insert(role, face);
                }
                None => {
                    tracing::warn!(role = role.name(), "no font resolved for role");
                }
            }
        }

        for (role, result) in settled {
            if let ResourceRole::Icon(id) = role {
                match result {
                    Ok(Resource::Image(img)) => {
                        prepared.icons.insert(id, img);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(icon = id.name(), error = %e, "icon unavailable, omitting"),
                }
            }
        }

        Ok(prepared)
    }

    fn lock_entries(
        &self,
    ) -> PosterResult<std::sync::MutexGuard<'_, HashMap<ResourceRole, Entry>>> {
        self.shared
            .entries
            .lock()
            .map_err(|_| PosterError::evaluation("resource cache lock poisoned"))
    }

    /// Start loading `req`. External sources are fetched on a dedicated thread so a stalled
    /// fetch never holds a rayon worker; decoding and icon rasterization run on rayon.
    fn spawn_load(&self, req: ResourceRequest, ticket: u64) {
        let shared = Arc::clone(&self.shared);
        let source = match &req.source {
            RequestSource::External(source) => source.clone(),
            RequestSource::BuiltinIcon(id) => {
                let id = *id;
                rayon::spawn(move || settle(&shared, &req, ticket, rasterize_icon(id)));
                return;
            }
        };

        let fetch_shared = Arc::clone(&shared);
        let fetch_req = req.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("posterkit-fetch-{ticket}"))
            .spawn(move || {
                let fetched = fetch_shared.fetcher.fetch(&source);
                match fetched {
                    Ok(bytes) => rayon::spawn(move || {
                        let result = decode_fetched(fetch_req.role, bytes);
                        settle(&fetch_shared, &fetch_req, ticket, result);
                    }),
                    Err(e) => settle(&fetch_shared, &fetch_req, ticket, Err(e)),
                }
            });
        if let Err(e) = spawned {
            let err = PosterError::resource(format!("spawn fetch thread: {e}"));
            settle(&shared, &req, ticket, Err(err));
        }
    }
}

/// Record the outcome of load `ticket` and wake its waiters.
fn settle(shared: &Shared, req: &ResourceRequest, ticket: u64, result: PosterResult<Resource>) {
    if let Err(e) = &result {
        tracing::warn!(role = ?req.role, source = %req.source.label(), error = %e, "resource load failed");
    }

    let Ok(mut entries) = shared.entries.lock() else {
        return;
    };
    let Some(entry) = entries.get_mut(&req.role) else {
        return;
    };
    // Superseded by a newer source, or already timed out.
    if entry.ticket != ticket {
        return;
    }
    let EntryState::Pending { waiters } = &mut entry.state else {
        return;
    };
    let waiters = std::mem::take(waiters);
    entry.state = match result {
        Ok(r) => EntryState::Ready(r),
        Err(e) => EntryState::Failed(e.to_string()),
    };
    drop(entries);

    for w in waiters {
        let _ = w.send(ticket);
    }
}

fn settled_result(
    entries: &HashMap<ResourceRole, Entry>,
    role: ResourceRole,
    ticket: u64,
) -> PosterResult<Resource> {
    match entries.get(&role) {
        Some(entry) if entry.ticket == ticket => match &entry.state {
            EntryState::Ready(r) => Ok(r.clone()),
            EntryState::Failed(msg) => Err(PosterError::resource(msg.clone())),
            EntryState::Pending { .. } => Err(PosterError::timeout("resource still pending")),
        },
        _ => Err(PosterError::resource(
            "resource entry was replaced while loading",
        )),
    }
}

fn rasterize_icon(id: IconId) -> PosterResult<Resource> {
    let tree = decode::parse_svg(id.svg().as_bytes())?;
    let img = decode::rasterize_svg(&tree, ICON_SIZE_PX, ICON_SIZE_PX)?;
    Ok(Resource::Image(Arc::new(img)))
}

fn decode_fetched(role: ResourceRole, bytes: Vec<u8>) -> PosterResult<Resource> {
    if role.is_font() {
        Ok(Resource::Font(Arc::new(decode::decode_font(bytes)?)))
    } else {
        Ok(Resource::Image(Arc::new(decode::decode_image(&bytes)?)))
    }
}

/// Everything a render pass needs, fully resolved. Rendering never performs IO.
#[derive(Clone, Debug, Default)]
pub struct PreparedResources {
    pub background: Option<Arc<DecodedImage>>,
    pub clipart: Option<Arc<DecodedImage>>,
    /// Resolved face per text role (custom font or system fallback).
    pub fonts: BTreeMap<FontRole, Arc<FontFace>>,
    pub icons: BTreeMap<IconId, Arc<DecodedImage>>,
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
