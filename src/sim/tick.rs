//! Fixed timestep simulation tick
//!
//! One tick: resolve collisions, apply held input, apply gravity, integrate.
//! While the player rides a track the path drives the position instead.

use super::entity::Renderable;
use super::player::{AnimationState, Movement};
use super::scene::{Scene, SceneError};
use crate::settings::Action;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Any surface touched the player this tick
    pub contact: bool,
    /// A track drove the player this tick
    pub riding: bool,
}

/// Steering strength: stronger at low speed, 1 when standing still
#[inline]
pub fn steering_curve(steer_base: f32, speed: f32) -> f32 {
    if speed == 0.0 { 1.0 } else { steer_base / speed }
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut Scene) -> Result<TickOutcome, SceneError> {
    let outcome = if scene.status.is_riding() {
        ride_step(scene)?
    } else {
        free_step(scene)?
    };

    scene.elapsed_ms += scene.tuning.tick_interval_ms;
    scene.ticks += 1;

    let player = scene.player.as_ref().ok_or(SceneError::NoPlayer)?;
    scene.camera = player.circle().center;
    Ok(outcome)
}

impl Scene {
    /// Run one tick, see [`tick`]
    pub fn game_tick(&mut self) -> Result<TickOutcome, SceneError> {
        tick(self)
    }
}

fn free_step(scene: &mut Scene) -> Result<TickOutcome, SceneError> {
    let deaths = scene.status.deaths;
    let contact = scene.do_collisions()?;
    let tuning = scene.tuning;
    let player = scene.player.as_mut().ok_or(SceneError::NoPlayer)?;

    let curve = steering_curve(tuning.steer_base, player.velocity.magnitude());
    let mut detach = false;
    for code in scene.held.iter() {
        match scene.bindings.action_for(code) {
            Some(Action::Right) if !scene.status.on_ice => player.velocity.delta.x += curve,
            Some(Action::Left) if !scene.status.on_ice => player.velocity.delta.x -= curve,
            Some(Action::Jump) => {
                if contact {
                    player.velocity.delta.y -= tuning.jump_impulse;
                }
                if scene.status.movement == Movement::Twine {
                    detach = true;
                }
            }
            _ => {}
        }
    }

    if !contact && scene.status.movement != Movement::Twine {
        player.velocity.delta.y += tuning.gravity;
    }

    player.velocity.recompute();
    player.move_step(tuning.snap_threshold);
    if scene.status.deaths != deaths {
        player.set_animation(AnimationState::Death);
    } else {
        player.set_animation(AnimationState::from_roll(player.velocity.delta.x));
    }

    scene.status.tick_exit_grace();
    if detach {
        log::debug!("Player let go of twine");
        scene.status.movement = Movement::Exiting {
            ticks_left: tuning.exit_grace_ticks,
        };
    }

    Ok(TickOutcome {
        contact,
        riding: false,
    })
}

fn ride_step(scene: &mut Scene) -> Result<TickOutcome, SceneError> {
    let tuning = scene.tuning;
    let jump_held = scene
        .held
        .iter()
        .any(|code| scene.bindings.action_for(code) == Some(Action::Jump));
    let player = scene.player.as_mut().ok_or(SceneError::NoPlayer)?;
    let Movement::Riding(ride) = &mut scene.status.movement else {
        return Ok(TickOutcome::default());
    };

    let leave = if jump_held && ride.kind.detachable() {
        log::debug!("Player jumped off {:?} track", ride.kind);
        true
    } else {
        let half_extent = player.body().half_extent();
        let step = ride.advance(player.circle().center, tuning.track_speed);
        player.update_position(step.center - half_extent);
        player.velocity.set(step.direction * tuning.track_speed);
        player.set_animation(AnimationState::from_travel(step.direction));
        if step.finished {
            log::debug!("Player reached the end of {:?} track", ride.kind);
        }
        step.finished
    };

    if leave {
        scene.status.movement = Movement::Exiting {
            ticks_left: tuning.exit_grace_ticks,
        };
    }

    Ok(TickOutcome {
        contact: false,
        riding: true,
    })
}
