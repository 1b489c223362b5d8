use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::LutError;

/// The five physical dimensions of an iLUT, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    SolarZenith,
    WaterVapor,
    Ozone,
    AerosolOpticalThickness,
    Altitude,
}

impl AxisKind {
    pub const ALL: [AxisKind; 5] = [
        AxisKind::SolarZenith,
        AxisKind::WaterVapor,
        AxisKind::Ozone,
        AxisKind::AerosolOpticalThickness,
        AxisKind::Altitude,
    ];
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisKind::SolarZenith => "solar_zenith",
            AxisKind::WaterVapor => "water_vapor",
            AxisKind::Ozone => "ozone",
            AxisKind::AerosolOpticalThickness => "aot",
            AxisKind::Altitude => "altitude",
        };
        write!(f, "{}", name)
    }
}

/// What to do with a coordinate that falls outside an axis' sampled range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainPolicy {
    /// Reject the query with [`LutError::OutOfDomain`].
    #[default]
    Strict,
    /// Pin the coordinate to the nearest end of the axis.
    Clamp,
}

/// Node positions of one grid dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    kind: AxisKind,
    nodes: Vec<f64>,
}

impl Axis {
    pub fn new(kind: AxisKind, nodes: Vec<f64>) -> Result<Self, LutError> {
        let increasing = nodes.windows(2).all(|w| w[0] < w[1]);
        if nodes.is_empty() || !increasing || nodes.iter().any(|v| !v.is_finite()) {
            return Err(LutError::InvalidAxis { axis: kind });
        }
        Ok(Self { kind, nodes })
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.nodes[0]
    }

    pub fn max(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    /// Finds the cell containing `value`.
    ///
    /// Returns the index of the lower bracketing node and the fractional
    /// position in `[0, 1]` towards the next node. A value equal to the last
    /// node lands in the last cell with fraction 1, so the result is
    /// continuous at the upper boundary. Single-node axes always return
    /// `(0, 0.0)` for their one valid value.
    pub fn locate(&self, value: f64, policy: DomainPolicy) -> Result<(usize, f64), LutError> {
        if value.is_nan() {
            return Err(LutError::InvalidCoordinate {
                axis: self.kind,
                value,
            });
        }

        let (min, max) = (self.min(), self.max());
        let target = if (min..=max).contains(&value) {
            value
        } else {
            match policy {
                DomainPolicy::Strict => {
                    return Err(LutError::OutOfDomain {
                        axis: self.kind,
                        value,
                        min,
                        max,
                    });
                }
                DomainPolicy::Clamp => value.clamp(min, max),
            }
        };

        if self.nodes.len() == 1 {
            return Ok((0, 0.0));
        }

        // Number of nodes <= target, minus one, kept inside the last cell.
        let upper = self.nodes.partition_point(|&node| node <= target);
        let idx = upper.saturating_sub(1).min(self.nodes.len() - 2);

        let lo = self.nodes[idx];
        let hi = self.nodes[idx + 1];
        let frac = ((target - lo) / (hi - lo)).clamp(0.0, 1.0);

        Ok((idx, frac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zenith_axis() -> Axis {
        Axis::new(AxisKind::SolarZenith, vec![0.0, 10.0, 20.0, 40.0]).unwrap()
    }

    #[test]
    fn test_axis_rejects_unsorted_nodes() {
        assert!(Axis::new(AxisKind::Ozone, vec![0.4, 0.3]).is_err());
        assert!(Axis::new(AxisKind::Ozone, vec![0.3, 0.3]).is_err());
        assert!(Axis::new(AxisKind::Ozone, vec![]).is_err());
        assert!(Axis::new(AxisKind::Ozone, vec![0.1, f64::NAN]).is_err());
    }

    #[test]
    fn test_locate_inside_and_on_nodes() {
        let axis = zenith_axis();
        assert_eq!(axis.locate(0.0, DomainPolicy::Strict).unwrap(), (0, 0.0));
        assert_eq!(axis.locate(10.0, DomainPolicy::Strict).unwrap(), (1, 0.0));
        assert_eq!(axis.locate(30.0, DomainPolicy::Strict).unwrap(), (2, 0.5));
        // Upper boundary stays in the last cell
        assert_eq!(axis.locate(40.0, DomainPolicy::Strict).unwrap(), (2, 1.0));
    }

    #[test]
    fn test_locate_strict_rejects_out_of_range() {
        let axis = zenith_axis();
        let err = axis.locate(41.0, DomainPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            LutError::OutOfDomain {
                axis: AxisKind::SolarZenith,
                value: 41.0,
                min: 0.0,
                max: 40.0,
            }
        );
        assert!(axis.locate(-0.5, DomainPolicy::Strict).is_err());
    }

    #[test]
    fn test_locate_clamp_pins_to_edges() {
        let axis = zenith_axis();
        assert_eq!(axis.locate(75.0, DomainPolicy::Clamp).unwrap(), (2, 1.0));
        assert_eq!(axis.locate(-3.0, DomainPolicy::Clamp).unwrap(), (0, 0.0));
    }

    #[test]
    fn test_locate_rejects_nan_even_when_clamping() {
        let axis = zenith_axis();
        assert!(matches!(
            axis.locate(f64::NAN, DomainPolicy::Clamp),
            Err(LutError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_single_node_axis() {
        let axis = Axis::new(AxisKind::Altitude, vec![0.0]).unwrap();
        assert_eq!(axis.locate(0.0, DomainPolicy::Strict).unwrap(), (0, 0.0));
        assert!(axis.locate(0.5, DomainPolicy::Strict).is_err());
        assert_eq!(axis.locate(0.5, DomainPolicy::Clamp).unwrap(), (0, 0.0));
    }
}
