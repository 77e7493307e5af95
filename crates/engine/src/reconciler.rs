// In crates/engine/src/reconciler.rs

use core_types::{Bar, PositionSide};
use execution::{Host, OrderIntent, OrderLifecycle};

/// The host reported a different position than the core last believed in.
///
/// Typical causes are a protective stop filling or an external forced close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drift {
    pub believed: PositionSide,
    pub reported: PositionSide,
}

/// Reconciles the core's bookkeeping with the host before a bar is evaluated.
///
/// The host position always wins. The protective stop is then brought in line
/// with it, which may cancel a stale stop or re-arm a missing one.
pub fn reconcile(
    believed: PositionSide,
    reported: PositionSide,
    lifecycle: &mut OrderLifecycle,
    bar: &Bar,
    host: &mut dyn Host,
) -> (Option<Drift>, Vec<OrderIntent>) {
    let drift = (believed != reported).then(|| {
        tracing::warn!(
            %believed,
            %reported,
            host = host.name(),
            "Host position differs from the last known side, adopting the host's."
        );
        Drift { believed, reported }
    });

    let intents = lifecycle.resync(reported, bar, host);
    (drift, intents)
}
