//! Damage, destruction, and shockwave lifecycle
//!
//! Removal happens by id after the damaging pass, so nothing is removed from
//! a list while it is being iterated.

use super::geometry::distance;
use super::state::{GameEvent, GameState, RemovalRecord};
use super::powerup::PowerUpKind;

/// Damage the ball deals on its next target hit, consuming one-shot effects
pub fn ball_hit_damage(state: &mut GameState, target_health: u32) -> u32 {
    let Some(ball) = state.ball.as_mut() else {
        return 1;
    };
    let Some(active) = ball.active_power_up.as_mut() else {
        return 1;
    };

    match active.kind {
        PowerUpKind::DoubleDamage if active.hits_remaining > 0 => {
            active.hits_remaining -= 1;
            if active.hits_remaining == 0 {
                ball.active_power_up = None;
            }
            2
        }
        PowerUpKind::SkullBall => {
            ball.active_power_up = None;
            target_health.max(1)
        }
        _ => 1,
    }
}

/// Apply `amount` damage to a live target
///
/// Health saturates at zero. A target reaching zero is removed, scores one
/// point for the round, leaves a removal record, and detonates a shockwave
/// sized to its radius. Returns true if the target was destroyed.
pub fn damage_target(state: &mut GameState, id: u32, amount: u32) -> bool {
    if amount == 0 {
        return false;
    }
    let Some(idx) = state.targets.iter().position(|t| t.id == id) else {
        log::debug!("Damage to target {} ignored, already removed", id);
        return false;
    };

    let target = &mut state.targets[idx];
    target.health = target.health.saturating_sub(amount);
    let destroyed = target.is_destroyed();
    state.events.push(GameEvent::TargetHit {
        id,
        position: target.position,
        damage: amount,
    });
    if !destroyed {
        return false;
    }

    let target = state.targets.remove(idx);
    state.score.current_score += 1;
    state.score.targets_destroyed_total += 1;
    state.removed.push(RemovalRecord {
        id: target.id,
        position: target.position,
        radius: target.radius,
        removed_at: state.time,
    });
    state.events.push(GameEvent::TargetDestroyed {
        id: target.id,
        position: target.position,
        radius: target.radius,
    });
    state.spawn_shockwave(target.position, target.radius);
    log::debug!(
        "Target {} destroyed ({} this round)",
        target.id,
        state.score.current_score
    );
    true
}

/// Grow every shockwave and damage targets it newly reaches
///
/// Each shockwave damages a given target at most once. Shockwaves spawned
/// by destructions during the sweep join on the next tick.
pub fn sweep_shockwaves(state: &mut GameState, dt: f32) {
    let count = state.shockwaves.len();
    for i in 0..count {
        state.shockwaves[i].grow(dt);
        let wave_pos = state.shockwaves[i].position;
        let wave_radius = state.shockwaves[i].current_radius();

        let reached: Vec<u32> = state
            .targets
            .iter()
            .filter(|t| distance(t.position, wave_pos) < t.radius + wave_radius)
            .filter(|t| !state.shockwaves[i].hit_set.contains(&t.id))
            .map(|t| t.id)
            .collect();

        for id in reached {
            state.shockwaves[i].hit_set.insert(id);
            damage_target(state, id, 1);
        }
    }

    state.shockwaves.retain(|s| !s.expired);
}

/// Drop removal records older than the configured lifetime
///
/// Ids of purged records are also forgotten by shockwave hit sets.
pub fn purge_removal_records(state: &mut GameState) {
    let ttl = state.tuning.removal_record_ttl;
    let now = state.time;
    let (expired, kept): (Vec<RemovalRecord>, Vec<RemovalRecord>) = std::mem::take(&mut state.removed)
        .into_iter()
        .partition(|r| now - r.removed_at >= ttl);
    state.removed = kept;

    for record in expired {
        for wave in &mut state.shockwaves {
            wave.hit_set.remove(&record.id);
        }
    }
}
