//! SGP4 propagation of a single element set.

use tletypes::prelude::*;

use crate::store::OrbitalElementSet;
use crate::units::Timestamp;

/// Equatorial radius of the WGS-72 model the orbit model is fitted to [km]
pub const MODEL_EARTH_RADIUS_KM: f64 = 6378.135;

#[derive(Debug, thiserror::Error)]
pub enum PropagationError {
    #[error("Malformed element set: {0}")]
    Malformed(sgp4::TleError),
    #[error("Element set rejected by the orbit model: {0}")]
    InvalidElements(sgp4::ElementsError),
    #[error("Propagation failed: {0}")]
    Model(sgp4::Error),
    #[error("Propagation produced a non-finite state")]
    NonFinite,
    #[error("Orbit has decayed, position is {0:.1} km from the Earth's center")]
    Decayed(f64),
}

/// Parsed elements and the model constants derived from them,
/// reusable across many propagation instants.
#[derive(Clone, Debug)]
pub struct PreparedElements {
    epoch: Timestamp,
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl PreparedElements {
    pub fn parse(set: &OrbitalElementSet) -> Result<Self, PropagationError> {
        let elements = sgp4::Elements::from_tle(
            Some(set.name.clone()),
            set.lines.line1.as_bytes(),
            set.lines.line2.as_bytes(),
        )
        .map_err(PropagationError::Malformed)?;
        Self::from_elements(elements)
    }

    pub fn from_elements(elements: sgp4::Elements) -> Result<Self, PropagationError> {
        let constants =
            sgp4::Constants::from_elements(&elements).map_err(PropagationError::InvalidElements)?;
        Ok(Self {
            epoch: Timestamp::from_naive_utc(elements.datetime),
            elements,
            constants,
        })
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    pub fn name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }

    /// TEME state at `t`, which may lie before the element epoch
    pub fn propagate(&self, t: Timestamp) -> Result<InertialPosition, PropagationError> {
        let minutes_since_epoch = (t - self.epoch).as_minutes();
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .map_err(PropagationError::Model)?;

        let state = InertialPosition::new(prediction.position, prediction.velocity);
        if !state.position.iter().chain(state.velocity.iter()).all(|v| v.is_finite()) {
            return Err(PropagationError::NonFinite);
        }

        let radius = state.position.norm();
        if radius < MODEL_EARTH_RADIUS_KM {
            return Err(PropagationError::Decayed(radius));
        }
        Ok(state)
    }
}

/// Propagates one element set to `t`
pub fn propagate(set: &OrbitalElementSet, t: Timestamp) -> Result<InertialPosition, PropagationError> {
    PreparedElements::parse(set)?.propagate(t)
}
