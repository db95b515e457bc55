use crate::render::{components, Body, Field, Render};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Not normalized; shown as received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub r: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularVelBias {
    pub x_pitch: f64,
    pub y_roll: f64,
    pub z_yaw: f64,
}

/// Navigation filter estimate of pose, motion and sensor bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub accel: Vec3,
    pub rot_quaternion: Quaternion,
    pub accel_bias: Vec3,
    pub angular_vel_bias: AngularVelBias,
}

impl Vec3 {
    fn text(&self) -> String {
        components(&[("x", self.x), ("y", self.y), ("z", self.z)])
    }
}

impl Quaternion {
    fn text(&self) -> String {
        components(&[("r", self.r), ("x", self.x), ("y", self.y), ("z", self.z)])
    }
}

impl AngularVelBias {
    fn text(&self) -> String {
        components(&[
            ("pitch", self.x_pitch),
            ("roll", self.y_roll),
            ("yaw", self.z_yaw),
        ])
    }
}

impl Render for NominalState {
    fn body(&self) -> Body {
        let field = |label, text| Field { label, text };

        Body::Fields(vec![
            field("Position", self.pos.text()),
            field("Velocity", self.vel.text()),
            field("Acceleration", self.accel.text()),
            field("Quaternion", self.rot_quaternion.text()),
            field("Accel Bias", self.accel_bias.text()),
            field("Angular Vel Bias", self.angular_vel_bias.text()),
        ])
    }
}
