//! Globe surface texture acquisition.
//!
//! The color texture walks an ordered list of candidate sources and settles on
//! the first one that loads; exhausting the list is a valid terminal state that
//! renders a flat color. The relief image is independent and optional.
//! Both are driven from outside: the caller issues the fetch for whatever
//! source [`TextureAcquisition::start`] / [`TextureAcquisition::on_failed`]
//! hands back and reports the outcome with the candidate index.

/// Where the color fallback chain stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionPhase {
    Idle,
    /// Waiting on the candidate at this index
    Pending(usize),
    Resolved(usize),
    Exhausted,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TextureAcquisition {
    candidates: Vec<String>,
    phase: AcquisitionPhase,
}

impl TextureAcquisition {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            phase: AcquisitionPhase::Idle,
        }
    }

    pub fn phase(&self) -> AcquisitionPhase {
        self.phase
    }

    /// First source to fetch. An empty list is exhausted immediately.
    pub fn start(&mut self) -> Option<(usize, &str)> {
        if self.phase != AcquisitionPhase::Idle {
            return None;
        }
        self.advance_to(0)
    }

    /// Accept a successful load. Ignored unless `index` is the one in flight.
    pub fn on_loaded(&mut self, index: usize) -> bool {
        if self.phase == AcquisitionPhase::Pending(index) {
            self.phase = AcquisitionPhase::Resolved(index);
            true
        } else {
            false
        }
    }

    /// Record a failed load and return the next source to try, if any.
    pub fn on_failed(&mut self, index: usize) -> Option<(usize, &str)> {
        if self.phase != AcquisitionPhase::Pending(index) {
            return None;
        }
        self.advance_to(index + 1)
    }

    /// Stop accepting completions. Called synchronously at teardown.
    pub fn cancel(&mut self) {
        self.phase = AcquisitionPhase::Cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase == AcquisitionPhase::Cancelled
    }

    fn advance_to(&mut self, index: usize) -> Option<(usize, &str)> {
        if index < self.candidates.len() {
            self.phase = AcquisitionPhase::Pending(index);
            Some((index, self.candidates[index].as_str()))
        } else {
            self.phase = AcquisitionPhase::Exhausted;
            None
        }
    }
}

/// Visual state of the globe surface. Each variant maps to one material build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    #[default]
    Loading,
    Textured,
    /// Flat color; every candidate failed
    Fallback,
}

/// Textures currently available to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureState<T> {
    pub color: Option<T>,
    pub relief: Option<T>,
    pub loading: bool,
}

impl<T> Default for TextureState<T> {
    fn default() -> Self {
        Self {
            color: None,
            relief: None,
            loading: true,
        }
    }
}

impl<T> TextureState<T> {
    pub fn surface(&self) -> SurfaceState {
        match (self.loading, self.color.is_some()) {
            (true, _) => SurfaceState::Loading,
            (false, true) => SurfaceState::Textured,
            (false, false) => SurfaceState::Fallback,
        }
    }

    /// Identity of the material this state renders with. A new key means a new material.
    pub fn material_key(&self) -> MaterialKey {
        MaterialKey {
            surface: self.surface(),
            relief: self.relief.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub surface: SurfaceState,
    pub relief: bool,
}

/// Outcome reported by whatever performs the fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Failed,
}

/// Color chain plus optional relief, folded into a [`TextureState`].
#[derive(Debug, Clone)]
pub struct SurfaceTextures<T> {
    pub acquisition: TextureAcquisition,
    relief_source: Option<String>,
    relief_done: bool,
    pub state: TextureState<T>,
}

impl<T> SurfaceTextures<T> {
    pub fn new(color_sources: Vec<String>, relief_source: Option<String>) -> Self {
        Self {
            acquisition: TextureAcquisition::new(color_sources),
            relief_source,
            relief_done: false,
            state: TextureState::default(),
        }
    }

    /// Sources to request at mount: first color candidate and the relief image.
    ///
    /// With no color candidates the surface goes straight to the fallback.
    pub fn start(&mut self) -> (Option<(usize, String)>, Option<String>) {
        let color = self
            .acquisition
            .start()
            .map(|(index, source)| (index, source.to_string()));
        if color.is_none() && self.acquisition.phase() == AcquisitionPhase::Exhausted {
            self.state.loading = false;
        }
        (color, self.relief_source.clone())
    }

    /// Apply a color candidate completion. Returns the next source to request.
    pub fn color_completed(&mut self, index: usize, outcome: FetchOutcome<T>) -> Option<(usize, String)> {
        if self.acquisition.is_cancelled() {
            return None;
        }
        match outcome {
            FetchOutcome::Loaded(texture) => {
                if self.acquisition.on_loaded(index) {
                    self.state.color = Some(texture);
                    self.state.loading = false;
                }
                None
            }
            FetchOutcome::Failed => {
                let next = self
                    .acquisition
                    .on_failed(index)
                    .map(|(i, source)| (i, source.to_string()));
                if self.acquisition.phase() == AcquisitionPhase::Exhausted {
                    self.state.loading = false;
                }
                next
            }
        }
    }

    /// Apply the relief completion. Failure is silently dropped.
    pub fn relief_completed(&mut self, outcome: FetchOutcome<T>) {
        if self.acquisition.is_cancelled() || self.relief_done {
            return;
        }
        self.relief_done = true;
        if let FetchOutcome::Loaded(texture) = outcome {
            self.state.relief = Some(texture);
        }
    }

    pub fn cancel(&mut self) {
        self.acquisition.cancel();
    }
}
