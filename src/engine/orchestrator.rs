use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    assets::fonts::SystemFonts,
    assets::loader::ResourceLoader,
    assets::source::{FsFetcher, ResourceFetcher},
    compile::plan::compile_poster,
    composition::model::PosterSpec,
    engine::config::EngineConfig,
    engine::export::Exporter,
    foundation::error::{PosterError, PosterResult},
    render::backend::{Poster, execute_plan},
    render::cpu::CpuBackend,
    text::measure::TextLayoutEngine,
};

/// Lifecycle of the most recent render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    ResourcesLoading,
    Painting,
    Complete,
}

/// How a call to [`Engine::render`] ended.
#[derive(Clone, Debug)]
pub enum RenderOutcome {
    /// The pass finished and its poster is now [`Engine::latest`].
    Complete(Arc<Poster>),
    /// A newer render started first; this pass painted nothing visible and published nothing.
    Superseded { generation: u64 },
}

impl RenderOutcome {
    pub fn poster(&self) -> Option<&Arc<Poster>> {
        match self {
            RenderOutcome::Complete(p) => Some(p),
            RenderOutcome::Superseded { .. } => None,
        }
    }
}

/// Composes posters from [`PosterSpec`]s.
///
/// Every call to [`Engine::render`] is stamped with a new generation. A pass checks that it
/// is still the newest one before each layer and again before publishing, so an older pass
/// never overwrites a newer poster. The engine is `Sync`; renders may be started from any
/// thread, and the paint surface is held by one pass at a time.
pub struct Engine {
    config: EngineConfig,
    loader: ResourceLoader,
    system_fonts: SystemFonts,
    generation: AtomicU64,
    state: Mutex<EngineState>,
    backend: Mutex<CpuBackend>,
    latest: Mutex<Option<Arc<Poster>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("generation", &self.generation())
            .field("state", &self.state())
            .finish()
    }
}

impl Engine {
    /// Engine reading resources from the filesystem under `config.asset_root`.
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = Arc::new(FsFetcher::new(config.asset_root.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Engine with a caller-supplied fetcher (network, app bundle, test doubles).
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let system_fonts = SystemFonts::load(config.system_fonts, &config.font_dirs);
        if system_fonts.is_empty() {
            tracing::warn!("no fallback fonts available; text layers will be omitted");
        }
        Self {
            config,
            loader: ResourceLoader::new(fetcher),
            system_fonts,
            generation: AtomicU64::new(0),
            state: Mutex::new(EngineState::Idle),
            backend: Mutex::new(CpuBackend::new()),
            latest: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generation of the newest render started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> EngineState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(EngineState::Idle)
    }

    /// The poster from the newest completed pass.
    pub fn latest(&self) -> Option<Arc<Poster>> {
        self.latest.lock().ok().and_then(|p| p.clone())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Move to `next` if `generation` is still the newest pass.
    ///
    /// New generations are only issued under the `state` lock, so the check and the write
    /// cannot interleave with a newer pass starting.
    fn enter(&self, generation: u64, next: EngineState) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if !self.is_current(generation) {
            return false;
        }
        tracing::debug!(generation, from = ?*state, to = ?next, "engine state");
        *state = next;
        true
    }

    /// Issue a new generation and reset the state to `Idle` in one step.
    fn begin_pass(&self) -> PosterResult<u64> {
        let mut state = Self::lock(&self.state, "engine state")?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = EngineState::Idle;
        Ok(generation)
    }

    fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> PosterResult<MutexGuard<'a, T>> {
        m.lock()
            .map_err(|_| PosterError::evaluation(format!("{what} lock poisoned")))
    }

    /// Render `spec` from scratch.
    ///
    /// Only invalid specs and internal failures return `Err`; unavailable resources fall back
    /// and the pass still completes.
    #[tracing::instrument(skip_all, fields(generation = tracing::field::Empty))]
    pub fn render(&self, spec: &PosterSpec) -> PosterResult<RenderOutcome> {
        spec.validate()?;

        let generation = self.begin_pass()?;
        tracing::Span::current().record("generation", generation);
        let superseded = || {
            tracing::warn!(generation, "render superseded by a newer spec");
            Ok(RenderOutcome::Superseded { generation })
        };

        if !self.enter(generation, EngineState::ResourcesLoading) {
            return superseded();
        }
        let resources = self
            .loader
            .prepare(spec, &self.system_fonts, self.config.timeouts())?;
        if !self.enter(generation, EngineState::Painting) {
            return superseded();
        }

        let mut text = TextLayoutEngine::new(&resources.fonts);
        let plan = compile_poster(spec, &resources, &mut text)?;

        let poster = {
            let mut backend = Self::lock(&self.backend, "paint surface")?;
            execute_plan(&mut *backend, &plan, || self.is_current(generation))?
        };
        let Some(poster) = poster else {
            return superseded();
        };

        let mut latest = Self::lock(&self.latest, "latest poster")?;
        // Publishing and entering `Complete` happen together or not at all.
        let mut state = Self::lock(&self.state, "engine state")?;
        if !self.is_current(generation) {
            return superseded();
        }
        let poster = Arc::new(poster);
        *latest = Some(poster.clone());
        tracing::debug!(generation, from = ?*state, to = ?EngineState::Complete, "engine state");
        *state = EngineState::Complete;
        drop(state);
        tracing::info!(generation, digest = %format_args!("{:016x}", poster.digest()), "poster complete");
        Ok(RenderOutcome::Complete(poster))
    }

    /// Hand the completed poster to `exporter`.
    ///
    /// Refused unless the newest pass has reached [`EngineState::Complete`].
    pub fn export(&self, exporter: &mut dyn Exporter) -> PosterResult<()> {
        if self.state() != EngineState::Complete {
            return Err(PosterError::validation(
                "export requires a completed poster",
            ));
        }
        let poster = self
            .latest()
            .ok_or_else(|| PosterError::validation("export requires a completed poster"))?;
        exporter.export(&poster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/orchestrator.rs"]
mod tests;
