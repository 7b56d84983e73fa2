use crate::error::{ ErrorKind, ProviderError };
use log::{ info, warn };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;

pub const MAX_CONSECUTIVE_ERRORS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    Idle,
    Degrading,
    OfflineForced,
}

/// How a 503 "model warming up" answer from the Llama proxy is accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelLoadingPolicy {
    /// Fall back for this request but leave the failure counter untouched.
    #[default]
    Ignore,
    /// Treat like any other hosted failure.
    CountAsFailure,
}

impl fmt::Display for ModelLoadingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoadingPolicy::Ignore => f.write_str("ignore"),
            ModelLoadingPolicy::CountAsFailure => f.write_str("count"),
        }
    }
}

impl FromStr for ModelLoadingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(ModelLoadingPolicy::Ignore),
            "count" | "count_as_failure" | "count-as-failure" => Ok(ModelLoadingPolicy::CountAsFailure),
            _ => Err(format!("Invalid model loading policy: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuotaTracker {
    consecutive_errors: u32,
    quota_exceeded: bool,
    forced_offline: bool,
    last_error: Option<ErrorKind>,
    policy: ModelLoadingPolicy,
}

impl QuotaTracker {
    pub fn new(policy: ModelLoadingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.forced_offline {
            TrackerState::OfflineForced
        } else if self.consecutive_errors > 0 {
            TrackerState::Degrading
        } else {
            TrackerState::Idle
        }
    }

    pub fn is_offline_forced(&self) -> bool {
        self.forced_offline
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn quota_exceeded(&self) -> bool {
        self.quota_exceeded
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn policy(&self) -> ModelLoadingPolicy {
        self.policy
    }

    pub fn record_success(&mut self) {
        if self.consecutive_errors > 0 || self.quota_exceeded {
            info!("Hosted call succeeded, clearing {} consecutive error(s)", self.consecutive_errors);
        }
        self.consecutive_errors = 0;
        self.quota_exceeded = false;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: &ProviderError) -> TrackerState {
        let kind = error.kind();
        self.last_error = Some(kind);

        if kind == ErrorKind::ModelLoading && self.policy == ModelLoadingPolicy::Ignore {
            return self.state();
        }

        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        if kind == ErrorKind::AuthOrQuota {
            self.quota_exceeded = true;
        }

        if
            !self.forced_offline &&
            (self.quota_exceeded || self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS)
        {
            self.forced_offline = true;
            warn!(
                "Switching to offline mode after {} consecutive error(s) (quota exceeded: {})",
                self.consecutive_errors,
                self.quota_exceeded
            );
        }
        self.state()
    }

    pub fn reset(&mut self) {
        info!("Quota status reset");
        self.consecutive_errors = 0;
        self.quota_exceeded = false;
        self.forced_offline = false;
        self.last_error = None;
    }
}
