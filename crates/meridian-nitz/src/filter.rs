//! Signal input filter
//!
//! Decides whether an incoming NITZ signal is worth processing at all, given
//! the previously accepted signal. Implemented as an ordered chain of
//! trivalent stages: the first stage with an opinion wins, and if every stage
//! abstains the signal is processed.

use std::sync::Arc;

use meridian_core::NitzSignal;
use tracing::debug;

use crate::{DeviceState, WakeGuard, WakeLock};

/// A single stage's opinion on a candidate signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    /// The signal must be processed.
    Accept,
    /// The signal must not be processed.
    Reject,
    /// No opinion; ask the next stage.
    Abstain,
}

/// The filter stages, evaluated in declaration order. Order matters: cheap
/// vetoes run before the rate-limit arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    /// Device-level "ignore time signals" switch.
    IgnoreAll,
    /// Rejects signals whose monotonic reference time is in the future or
    /// implausibly old; rate-limit math would be meaningless.
    BogusReference,
    /// The first signal ever seen is always processed.
    NoHistory,
    /// Rejects candidates older than the previously accepted signal. The
    /// rate-limit arithmetic assumes non-decreasing reference times, so a
    /// delayed out-of-order signal is dropped rather than processed.
    StaleReference,
    /// Terminal stage: suppress signals too similar to the previous one,
    /// received too soon after it.
    RateLimit,
}

/// Trivalent predicate chain over incoming signals.
pub struct SignalFilter {
    device: Arc<dyn DeviceState>,
    wake_lock: Arc<dyn WakeLock>,
    stages: Vec<Stage>,
}

impl SignalFilter {
    /// The standard production chain.
    pub fn standard(device: Arc<dyn DeviceState>, wake_lock: Arc<dyn WakeLock>) -> Self {
        SignalFilter {
            device,
            wake_lock,
            stages: vec![
                Stage::IgnoreAll,
                Stage::BogusReference,
                Stage::NoHistory,
                Stage::StaleReference,
                Stage::RateLimit,
            ],
        }
    }

    /// Runs the chain. `previous` is the last signal that was accepted, if
    /// any; `candidate` is the newly arrived signal.
    pub fn must_process(&self, previous: Option<&NitzSignal>, candidate: &NitzSignal) -> bool {
        for stage in &self.stages {
            match self.vote(*stage, previous, candidate) {
                Vote::Accept => return true,
                Vote::Reject => {
                    debug!(?stage, "signal filtered out");
                    return false;
                }
                Vote::Abstain => {}
            }
        }
        // The default is to process.
        true
    }

    fn vote(&self, stage: Stage, previous: Option<&NitzSignal>, candidate: &NitzSignal) -> Vote {
        match stage {
            Stage::IgnoreAll => {
                if self.device.ignore_time_signals() {
                    Vote::Reject
                } else {
                    Vote::Abstain
                }
            }
            Stage::BogusReference => {
                // The monotonic clock read needs the device held awake.
                // The reference stamp is network-influenced; saturate rather
                // than trust it to stay in range.
                let age = {
                    let _guard = WakeGuard::hold(&*self.wake_lock);
                    self.device
                        .elapsed_realtime_millis()
                        .saturating_sub(candidate.reference_millis)
                };
                if age < 0 || age > i32::MAX as i64 {
                    Vote::Reject
                } else {
                    Vote::Abstain
                }
            }
            Stage::NoHistory => {
                if previous.is_none() {
                    Vote::Accept
                } else {
                    Vote::Abstain
                }
            }
            Stage::StaleReference => match previous {
                Some(prev) if candidate.reference_millis < prev.reference_millis => Vote::Reject,
                _ => Vote::Abstain,
            },
            Stage::RateLimit => {
                // NoHistory accepted before this stage can see a missing
                // previous signal.
                let Some(prev) = previous else {
                    return Vote::Accept;
                };
                self.rate_limit_vote(prev, candidate)
            }
        }
    }

    /// Terminal rate-limit stage; never abstains.
    fn rate_limit_vote(&self, previous: &NitzSignal, candidate: &NitzSignal) -> Vote {
        // Any change in the discrete offset fields must be processed no
        // matter how recent the previous signal was.
        if !candidate.data.offset_info_eq(&previous.data) {
            return Vote::Accept;
        }

        let spacing = self.device.update_spacing_millis();
        let diff = self.device.update_diff_millis();

        // utc_millis comes straight off the network and can sit anywhere in
        // the i64 range; saturating math keeps an absurd value a large drift
        // instead of a wrapped one.
        let elapsed = candidate
            .reference_millis
            .saturating_sub(previous.reference_millis);
        let utc_delta = candidate
            .data
            .utc_millis
            .saturating_sub(previous.data.utc_millis);
        // Zero for a pair of consistent signals.
        let drift = utc_delta.saturating_sub(elapsed).saturating_abs();

        if elapsed > spacing || drift > diff {
            Vote::Accept
        } else {
            Vote::Reject
        }
    }
}
