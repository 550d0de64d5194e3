use ai_core::{AgentId, EntityId};

use crate::{DetectableKind, PerceptionError, PerceptionQuery, SensorConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ForcedSight {
    remaining: f32,
    restore: bool,
}

/// Vision sensor owned by one agent.
///
/// Tracks two independent flags: `player_in_sight`, refreshed by periodic
/// scans, and `hidden`, pushed in from the game. Scans happen on a fixed timer
/// rather than every frame.
#[derive(Debug, Clone)]
pub struct AiSensor {
    config: SensorConfig,
    since_scan: f32,
    in_sight: bool,
    sighted: Option<EntityId>,
    hidden: bool,
    /// Sight value captured by `pause`, restored by `resume`.
    paused: Option<bool>,
    forced: Option<ForcedSight>,
    scans: u64,
}

impl AiSensor {
    pub fn new(config: SensorConfig) -> Result<Self, PerceptionError> {
        config.validate()?;
        Ok(Self {
            config,
            since_scan: 0.0,
            in_sight: false,
            sighted: None,
            hidden: false,
            paused: None,
            forced: None,
            scans: 0,
        })
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Fail early when `agent` cannot be scanned from.
    pub fn check_rig<Q>(query: &Q, agent: Q::Agent) -> Result<(), PerceptionError>
    where
        Q: PerceptionQuery + ?Sized,
    {
        match query.head_pose(agent) {
            Some(_) => Ok(()),
            None => Err(PerceptionError::MissingHeadReference {
                agent: agent.stable_id(),
            }),
        }
    }

    /// Advance timers by `dt` seconds and scan when the scan period elapses.
    ///
    /// A paused sensor does nothing: neither the scan timer nor a forced
    /// sight counts down.
    pub fn tick<Q>(&mut self, dt: f32, query: &Q, agent: Q::Agent)
    where
        Q: PerceptionQuery + ?Sized,
    {
        if self.paused.is_some() {
            return;
        }
        let dt = dt.max(0.0);
        self.advance_forced(dt);

        self.since_scan += dt;
        let period = self.config.scan_period();
        if self.since_scan < period {
            return;
        }
        self.since_scan %= period;
        if self.forced.is_some() {
            return;
        }
        self.scan(query, agent);
    }

    /// Run one scan immediately, regardless of the timer.
    ///
    /// Overlap query, then player tag, then the half-angle cone test, then the
    /// occlusion cast from the head to the player's sight point. A scan that
    /// sees nobody leaves sight `false`.
    pub fn scan<Q>(&mut self, query: &Q, agent: Q::Agent) -> bool
    where
        Q: PerceptionQuery + ?Sized,
    {
        self.scans += 1;
        let Some(head) = query.head_pose(agent) else {
            self.apply(agent.stable_id(), None);
            return false;
        };

        let half_fov = self.config.half_fov();
        let mut seen = None;
        for hit in query.overlap_detectable(head.position, self.config.radius) {
            if hit.kind != DetectableKind::Player {
                continue;
            }
            let to_target = hit.sight_point - head.position;
            if head.forward.angle_between(to_target) > half_fov {
                continue;
            }
            if query.linecast(head.position, hit.sight_point).is_none() {
                seen = Some(hit.entity);
                break;
            }
        }
        self.apply(agent.stable_id(), seen);
        self.in_sight
    }

    fn apply(&mut self, agent: u64, seen: Option<EntityId>) {
        let now = seen.is_some();
        if now != self.in_sight {
            if now {
                tracing::debug!(agent, target = ?seen, "sight gained");
            } else {
                tracing::debug!(agent, "sight lost");
            }
        }
        self.in_sight = now;
        if seen.is_some() {
            self.sighted = seen;
        }
    }

    pub fn player_in_sight(&self) -> bool {
        self.in_sight
    }

    /// Entity of the most recent successful sighting.
    pub fn sighted(&self) -> Option<EntityId> {
        self.sighted
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn scans(&self) -> u64 {
        self.scans
    }

    /// Freeze perception. A second `pause` keeps the first snapshot.
    pub fn pause(&mut self) {
        if self.paused.is_none() {
            self.paused = Some(self.in_sight);
            tracing::debug!(in_sight = self.in_sight, "sensor paused");
        }
    }

    /// Restore sight to its value at `pause` and start ticking again.
    pub fn resume(&mut self) {
        if let Some(snapshot) = self.paused.take() {
            self.in_sight = snapshot;
            tracing::debug!(in_sight = snapshot, "sensor resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Report the player as seen for `seconds`, then fall back to the value
    /// sight had before. Re-forcing extends the window but keeps the
    /// original fallback.
    pub fn force_sight_for(&mut self, seconds: f32) {
        let seconds = seconds.max(0.0);
        let current = *self.sight_slot();
        let restore = match self.forced {
            Some(f) => f.restore,
            None => current,
        };
        self.forced = Some(ForcedSight {
            remaining: seconds,
            restore,
        });
        *self.sight_slot() = true;
        tracing::debug!(seconds, "forced sight started");
    }

    pub fn cancel_forced_sight(&mut self) {
        if let Some(f) = self.forced.take() {
            *self.sight_slot() = f.restore;
            tracing::debug!(restored = f.restore, "forced sight cancelled");
        }
    }

    pub fn forced_sight_remaining(&self) -> Option<f32> {
        self.forced.map(|f| f.remaining)
    }

    fn advance_forced(&mut self, dt: f32) {
        let Some(mut f) = self.forced else {
            return;
        };
        f.remaining -= dt;
        if f.remaining <= 0.0 {
            self.forced = None;
            self.in_sight = f.restore;
            tracing::debug!(restored = f.restore, "forced sight expired");
        } else {
            self.forced = Some(f);
        }
    }

    /// While paused, overrides target the snapshot so `resume` honours them.
    fn sight_slot(&mut self) -> &mut bool {
        match self.paused.as_mut() {
            Some(snapshot) => snapshot,
            None => &mut self.in_sight,
        }
    }
}
