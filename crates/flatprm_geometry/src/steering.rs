//! Closed-form cubic boundary-value steering.
//!
//! The steering function is the only link between the configuration-space
//! PRM and continuous-time dynamics: a roadmap edge is not a straight line
//! in flat-state space, it is the cubic spline that matches position and
//! velocity at both ends over a fixed horizon `T`.

use flatprm_linalg::{Float, Polynomial};

use crate::FlatState;

/// Fault raised by [`steer`] when given a non-positive horizon.
///
/// This is a programmer-error fault: the planner never calls `steer` with
/// `T <= 0` internally, so seeing this error means a caller passed a bad
/// horizon directly.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SteeringError {
    #[error("steering horizon must be positive, got {0}")]
    InvalidHorizon(Float),
}

/// Solve for the cubic `p(t)` with `p(0) = y0, p'(0) = dy0, p(T) = yf,
/// p'(T) = dyf`, given `flat_dimension` (the length of the configuration
/// segment of each flat state).
///
/// ```text
/// c0 = y0
/// c1 = dy0
/// d1 =  yf - y0 - dy0*T
/// d2 = dyf - dy0
/// c2 =  3*d1/T^2 - d2/T
/// c3 = -2*d1/T^3 + d2/T^2
/// ```
pub fn steer(
    y0: &FlatState,
    yf: &FlatState,
    horizon: Float,
    flat_dimension: usize,
) -> Result<Polynomial, SteeringError> {
    if horizon <= 0.0 {
        return Err(SteeringError::InvalidHorizon(horizon));
    }

    let p0 = y0.segment(flat_dimension, 0);
    let v0 = y0.segment(flat_dimension, 1);
    let pf = yf.segment(flat_dimension, 0);
    let vf = yf.segment(flat_dimension, 1);

    let t = horizon;
    let d1 = &pf - &p0 - &v0 * t;
    let d2 = &vf - &v0;

    let c0 = p0;
    let c1 = v0;
    let c2 = &d1 * (3.0 / (t * t)) - &d2 * (1.0 / t);
    let c3 = &d1 * (-2.0 / (t * t * t)) + &d2 * (1.0 / (t * t));

    Ok(Polynomial::new(3, vec![c0, c1, c2, c3]))
}
