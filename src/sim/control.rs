//! Control vocabulary shared by human input and the scripted opponent
//!
//! Both sources resolve to a [`Controls`] value once per frame; the same
//! code then moves the controlled unit and charges its shot.

use glam::Vec2;

use super::body::Body;
use super::tick::TickInput;
use crate::consts::{AIM_RATE, CHARGE_RATE, JUMP_SPEED_X, JUMP_SPEED_Y};
use crate::normalize_angle;

/// Resolved control signal for the controlled unit this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub jump: bool,
    /// Aim axis in [-1, 1]: negative turns left, positive turns right
    pub aim: f32,
    pub charge_pressed: bool,
    pub charge_held: bool,
    pub charge_released: bool,
}

impl Controls {
    /// Map the keyboard-style input onto controls
    pub fn from_input(input: &TickInput) -> Self {
        let mut aim = 0.0;
        if input.aim_left_held {
            aim -= 1.0;
        }
        if input.aim_right_held {
            aim += 1.0;
        }
        Self {
            jump: input.jump_pressed,
            aim,
            charge_pressed: input.charge_pressed,
            charge_held: input.charge_held,
            charge_released: input.charge_released,
        }
    }
}

/// Jump and aim. Only called while the unit is at rest.
pub fn steer(body: &mut Body, controls: &Controls, dt: f32) {
    let Some(unit) = body.unit_mut() else {
        return;
    };

    if controls.aim != 0.0 {
        let turn = AIM_RATE * controls.aim.clamp(-1.0, 1.0) * dt;
        unit.aim_angle = normalize_angle(unit.aim_angle + turn);
    }

    if controls.jump {
        let angle = unit.aim_angle;
        body.vel = Vec2::new(JUMP_SPEED_X * angle.cos(), JUMP_SPEED_Y * angle.sin());
        body.stable = false;
    }
}

/// Shot charge: pressing starts from zero, holding fills at a fixed rate and
/// fires on its own when full, releasing fires whatever has built up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargeMeter {
    pub charging: bool,
    pub energy: f32,
}

impl ChargeMeter {
    /// Feed one frame of controls. Returns the shot energy when the weapon
    /// fires this frame.
    pub fn update(&mut self, controls: &Controls, dt: f32) -> Option<f32> {
        let mut fire = false;

        if controls.charge_pressed {
            self.charging = true;
            self.energy = 0.0;
        }

        if controls.charge_held && self.charging {
            self.energy += CHARGE_RATE * dt;
            if self.energy >= 1.0 {
                self.energy = 1.0;
                fire = true;
            }
        }

        if controls.charge_released {
            if self.charging {
                fire = true;
            }
            self.charging = false;
        }

        if fire {
            let energy = self.energy;
            self.reset();
            Some(energy)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.charging = false;
        self.energy = 0.0;
    }
}
