//! The lookup-and-render flow.
//!
//! [`update`] is the whole behavior as a pure transition over [`FlowState`].
//! [`LookupFlow`] drives it: it owns the injected lookup service, opener and
//! screen, runs the effects a transition asks for, and re-projects the state
//! onto the screen after every step.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use enum_iterator::Sequence;
use futures_util::FutureExt as _;
use tokio::time::Instant;

use crate::error::{FlowError, LookupError, ValidationError};
use crate::extractors::VideoInfo;
use crate::lookup::{LookupResult, LookupService};
use crate::opener::Opener;
use crate::render::{self, Page, Screen};

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// How much a submitted URL is checked before it is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Sequence)]
pub enum ValidationPolicy {
    /// Must parse as an absolute URL with a host.
    #[default]
    Strict,
    /// Must be non-empty after trimming.
    NonEmpty,
}

impl ValidationPolicy {
    pub fn get_name(&self) -> &'static str {
        match self {
            ValidationPolicy::Strict => "strict",
            ValidationPolicy::NonEmpty => "non-empty",
        }
    }

    pub fn validate(&self, input: &str) -> Result<LookupRequest, ValidationError> {
        let url = input.trim();

        match self {
            ValidationPolicy::Strict => {
                let is_valid = url::Url::parse(url).map(|parsed| parsed.has_host()).unwrap_or(false);

                if !is_valid {
                    return Err(ValidationError::Invalid);
                }
            }
            ValidationPolicy::NonEmpty => {
                if url.is_empty() {
                    return Err(ValidationError::Empty);
                }
            }
        }

        Ok(LookupRequest { url: url.to_owned() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub policy: ValidationPolicy,
    pub notice_duration: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success { id: u64, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowState {
    pub phase: Phase,
    pub result: Option<VideoInfo>,
    pub notice: Option<Notice>,
    pub(crate) next_notice_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(String),
    LookupFinished(Result<VideoInfo, LookupError>),
    /// Zero-based index into the rendered formats.
    SelectFormat(usize),
    DismissNotice(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetBusy(bool),
    StartLookup(LookupRequest),
    OpenExternal(String),
    DismissNoticeAfter { notice_id: u64, after: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: FlowState,
    pub effects: Vec<Effect>,
    pub error: Option<FlowError>,
}

impl Step {
    fn new(state: FlowState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            error: None,
        }
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn error(mut self, error: FlowError) -> Self {
        self.error = Some(error);
        self
    }
}

pub fn update(state: &FlowState, event: Event, config: &FlowConfig) -> Step {
    match event {
        Event::Submit(input) => {
            if state.phase == Phase::Busy {
                return Step::new(state.clone()).error(FlowError::Busy);
            }

            let mut next = state.clone();
            next.result = None;
            next.notice = None;

            match config.policy.validate(&input) {
                Ok(request) => {
                    next.phase = Phase::Busy;
                    Step::new(next)
                        .effect(Effect::SetBusy(true))
                        .effect(Effect::StartLookup(request))
                }
                Err(err) => {
                    next.notice = Some(Notice::Error(err.to_string()));
                    Step::new(next).error(err.into())
                }
            }
        }
        Event::LookupFinished(outcome) => {
            let mut next = state.clone();
            next.phase = Phase::Idle;

            let step = match outcome {
                Ok(info) => {
                    next.result = Some(info);
                    next.notice = None;
                    Step::new(next)
                }
                Err(err) => {
                    next.result = None;
                    next.notice = Some(Notice::Error(err.to_string()));
                    Step::new(next).error(err.into())
                }
            };

            step.effect(Effect::SetBusy(false))
        }
        Event::SelectFormat(index) => {
            let Some(format) = state.result.as_ref().and_then(|info| info.formats.get(index)) else {
                return Step::new(state.clone()).error(FlowError::NoSuchFormat(index.saturating_add(1)));
            };

            let mut next = state.clone();
            let notice_id = next.next_notice_id;
            next.next_notice_id += 1;
            next.notice = Some(Notice::Success {
                id: notice_id,
                text: format!("Download started: {}", format.label()),
            });

            Step::new(next)
                .effect(Effect::OpenExternal(format.target_url.clone()))
                .effect(Effect::DismissNoticeAfter {
                    notice_id,
                    after: config.notice_duration,
                })
        }
        Event::DismissNotice(notice_id) => {
            let mut next = state.clone();

            if matches!(next.notice, Some(Notice::Success { id, .. }) if id == notice_id) {
                next.notice = None;
            }

            Step::new(next)
        }
    }
}

pub struct LookupFlow<S, O, D> {
    service: S,
    opener: O,
    screen: D,
    config: FlowConfig,
    state: FlowState,
    pending_dismissal: Option<(u64, Instant)>,
}

impl<S: LookupService, O: Opener, D: Screen> LookupFlow<S, O, D> {
    pub fn new(service: S, opener: O, screen: D, config: FlowConfig) -> Self {
        Self {
            service,
            opener,
            screen,
            config,
            state: FlowState::default(),
            pending_dismissal: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn page(&self) -> Page {
        render::project(&self.state)
    }

    pub fn screen(&self) -> &D {
        &self.screen
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Validates `input`, looks it up and renders the outcome.
    ///
    /// The flow is idle again when this returns, whatever the outcome.
    pub async fn submit_lookup(&mut self, input: &str) -> Result<VideoInfo, FlowError> {
        log::debug!("Submitted: {:?}", input);

        // A submit step either errors or starts exactly one lookup.
        let Some(request) = self.apply(Event::Submit(input.to_owned()))? else {
            return Err(FlowError::Busy);
        };

        let outcome = self.run_lookup(&request).await;
        match &outcome {
            Ok(info) => log::info!("Found \"{}\" with {} formats", info.title, info.formats.len()),
            Err(err) => log::info!("Lookup of {} failed: {}", request.url, err),
        }

        self.apply(Event::LookupFinished(outcome.clone()))?;

        outcome.map_err(FlowError::from)
    }

    /// Opens the format at the zero-based `index` and returns its target.
    pub fn select_format(&mut self, index: usize) -> Result<String, FlowError> {
        let target = self
            .state
            .result
            .as_ref()
            .and_then(|info| info.formats.get(index))
            .map(|format| format.target_url.clone());

        self.apply(Event::SelectFormat(index))?;

        target.ok_or(FlowError::NoSuchFormat(index.saturating_add(1)))
    }

    pub fn notice_deadline(&self) -> Option<Instant> {
        self.pending_dismissal.map(|(_, deadline)| deadline)
    }

    /// Waits for the pending success notice to time out and dismisses it.
    ///
    /// Returns `false` right away when nothing is pending.
    pub async fn expire_notice(&mut self) -> bool {
        let Some((notice_id, deadline)) = self.pending_dismissal else {
            return false;
        };

        tokio::time::sleep_until(deadline).await;
        self.pending_dismissal = None;
        self.apply(Event::DismissNotice(notice_id)).is_ok()
    }

    async fn run_lookup(&self, request: &LookupRequest) -> Result<VideoInfo, LookupError> {
        let lookup = AssertUnwindSafe(self.service.lookup_video(&request.url))
            .catch_unwind()
            .await;

        match lookup {
            Ok(Ok(LookupResult::Success(info))) => Ok(info),
            Ok(Ok(LookupResult::Failure { message })) => Err(LookupError::NotFound(message)),
            Ok(Err(err)) => {
                log::error!("Lookup service failed: {:#}", err);
                let message = err.to_string();

                if message.is_empty() {
                    Err(LookupError::Unexpected(UNEXPECTED_MESSAGE.to_string()))
                } else {
                    Err(LookupError::Unexpected(message))
                }
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|reason| reason.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                log::error!("Lookup service panicked: {}", reason);
                Err(LookupError::Unexpected(UNEXPECTED_MESSAGE.to_string()))
            }
        }
    }

    fn apply(&mut self, event: Event) -> Result<Option<LookupRequest>, FlowError> {
        let Step { state, effects, error } = update(&self.state, event, &self.config);
        self.state = state;

        let mut request = None;
        for effect in effects {
            match effect {
                Effect::SetBusy(busy) => self.screen.set_busy(busy),
                Effect::StartLookup(lookup_request) => request = Some(lookup_request),
                Effect::OpenExternal(url) => {
                    if let Err(err) = self.opener.open_external(&url) {
                        log::warn!("Failed to open {}: {:#}", url, err);
                    }
                }
                Effect::DismissNoticeAfter { notice_id, after } => {
                    self.pending_dismissal = Some((notice_id, Instant::now() + after));
                }
            }
        }

        // Drop the timer once its notice is no longer on screen.
        let notice_shown = matches!(
            (&self.state.notice, self.pending_dismissal),
            (Some(Notice::Success { id, .. }), Some((pending_id, _))) if *id == pending_id
        );
        if !notice_shown {
            self.pending_dismissal = None;
        }

        self.screen.show(&render::project(&self.state));

        match error {
            Some(err) => Err(err),
            None => Ok(request),
        }
    }
}
