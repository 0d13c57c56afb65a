use crate::config::ElevatorConfig;

/// Distance under which the car is considered to have arrived. An exact
/// float comparison here can keep the car in Moving forever.
pub const ARRIVAL_EPSILON: f64 = 0.005;

/**
 * Single-axis kinematic model for the car.
 *
 * Each tick the model decides between accelerating toward cruise speed and
 * braking, based on whether the remaining distance is shorter than the
 * distance needed to decelerate to rest at `max_acceleration`. Acceleration
 * is clamped directly rather than derived from forces; mass, friction and
 * collisions are deliberately ignored.
 */
#[derive(Debug, Clone, Copy)]
pub struct MotionProfile {
    max_speed: f64,
    max_acceleration: f64,
}

impl MotionProfile {
    pub fn new(config: &ElevatorConfig) -> MotionProfile {
        MotionProfile {
            max_speed: config.max_speed,
            max_acceleration: config.max_acceleration,
        }
    }

    /// Distance needed to decelerate from `velocity` to rest.
    pub fn braking_distance(&self, velocity: f64) -> f64 {
        velocity * velocity / (2.0 * self.max_acceleration)
    }

    /// Advance one tick toward `target`, returning the new position and
    /// velocity.
    pub fn step(&self, position: f64, velocity: f64, target: f64, dt: f64) -> (f64, f64) {
        if dt <= 0.0 {
            return (position, velocity);
        }

        let remaining = (target - position).abs();
        let brake = remaining < self.braking_distance(velocity);

        let desired_velocity = if brake {
            0.0
        } else if target > position {
            self.max_speed
        } else {
            -self.max_speed
        };

        let acceleration = ((desired_velocity - velocity) / dt)
            .clamp(-self.max_acceleration, self.max_acceleration);

        let new_velocity = velocity + acceleration * dt;
        let new_position = position + new_velocity * dt;
        (new_position, new_velocity)
    }
}

/// Arrival check on the vertical axis.
pub fn has_arrived(position: f64, target: f64) -> bool {
    (target - position).abs() < ARRIVAL_EPSILON
}

/***************************************/
/*             Unit tests              */
/***************************************/
