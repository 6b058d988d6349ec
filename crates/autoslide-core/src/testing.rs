//! Hand-written fakes shared by the unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use autoslide_protocols::{
    Indicator, Observation, ProviderError, Selector, Surface, SurfaceError, VisionProvider,
    VisionRequest, VisionResponse,
};
use parking_lot::Mutex;

/// Provider answering from a fixed script, one entry per call.
pub struct ScriptedProvider {
    id: String,
    answers: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<VisionRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: &str, answers: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            id: id.to_string(),
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(id: &str, answers: &[&str]) -> Self {
        Self::new(id, answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl VisionProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse, ProviderError> {
        self.requests.lock().push(request);
        let answer = self
            .answers
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::InvalidResponse("script exhausted".into())))?;
        Ok(VisionResponse::text("scripted", answer))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Screenshot(String),
    SetOffset(String, f64),
    Press(String),
    Move(f64),
    Release,
    Poll,
    Reset,
}

#[derive(Default)]
struct PointerState {
    held: bool,
    position: f64,
    visual: f64,
    released_at: Option<f64>,
    shots: usize,
}

/// Surface whose success indicator appears once a drag is released at `target` px.
pub struct FakeSurface {
    target: Option<f64>,
    fail_reset: bool,
    fail_screenshots_after: Option<usize>,
    state: Mutex<PointerState>,
    events: Mutex<Vec<SurfaceEvent>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            target: None,
            fail_reset: false,
            fail_screenshots_after: None,
            state: Mutex::new(PointerState::default()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn solved_at(mut self, target_px: f64) -> Self {
        self.target = Some(target_px);
        self
    }

    pub fn without_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    pub fn failing_screenshots_after(mut self, count: usize) -> Self {
        self.fail_screenshots_after = Some(count);
        self
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| matches(e)).count()
    }

    /// Pointer positions at each release.
    pub fn release_positions(&self) -> Vec<f64> {
        let mut positions = Vec::new();
        let mut position = 0.0;
        for event in self.events.lock().iter() {
            match event {
                SurfaceEvent::Press(_) => position = 0.0,
                SurfaceEvent::Move(delta) => position += delta,
                SurfaceEvent::Release => positions.push(position),
                _ => {}
            }
        }
        positions
    }

    pub fn is_held(&self) -> bool {
        self.state.lock().held
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl Surface for FakeSurface {
    async fn screenshot(&self, region: &Selector) -> Result<Observation, SurfaceError> {
        self.record(SurfaceEvent::Screenshot(region.to_string()));
        let mut state = self.state.lock();
        if let Some(limit) = self.fail_screenshots_after {
            if state.shots >= limit {
                return Err(SurfaceError::ScreenshotFailed(region.to_string()));
            }
        }
        state.shots += 1;
        Ok(Observation::png(
            format!("{}#{}", region, state.shots),
            format!("visual={}", state.visual),
        ))
    }

    async fn set_visual_offset(&self, element: &Selector, offset_px: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceEvent::SetOffset(element.to_string(), offset_px));
        self.state.lock().visual = offset_px;
        Ok(())
    }

    async fn press_hold(&self, element: &Selector) -> Result<(), SurfaceError> {
        self.record(SurfaceEvent::Press(element.to_string()));
        let mut state = self.state.lock();
        state.held = true;
        state.position = 0.0;
        Ok(())
    }

    async fn move_by(&self, delta_px: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceEvent::Move(delta_px));
        let mut state = self.state.lock();
        if !state.held {
            return Err(SurfaceError::ActionFailed("pointer not held".into()));
        }
        state.position += delta_px;
        Ok(())
    }

    async fn release(&self) -> Result<(), SurfaceError> {
        self.record(SurfaceEvent::Release);
        let mut state = self.state.lock();
        state.held = false;
        state.released_at = Some(state.position);
        Ok(())
    }

    async fn poll_for_indicator(
        &self,
        _indicator: &Indicator,
        _timeout: Duration,
    ) -> Result<bool, SurfaceError> {
        self.record(SurfaceEvent::Poll);
        let state = self.state.lock();
        Ok(match (self.target, state.released_at) {
            (Some(target), Some(at)) => (at - target).abs() < 0.5,
            _ => false,
        })
    }

    async fn trigger_reset(&self) -> Result<(), SurfaceError> {
        self.record(SurfaceEvent::Reset);
        if self.fail_reset {
            return Err(SurfaceError::ElementNotFound(".geetest_refresh_1".into()));
        }
        let mut state = self.state.lock();
        state.released_at = None;
        state.visual = 0.0;
        Ok(())
    }
}
