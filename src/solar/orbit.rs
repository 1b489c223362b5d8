use std::f64::consts::PI;

/// Eccentricity of the Earth's orbit.
pub const ECCENTRICITY: f64 = 0.01672;
/// Day of year of perihelion.
pub const PERIHELION_DAY: f64 = 4.0;
/// Length of the anomalistic year used for the correction, in days.
pub const YEAR_LENGTH: f64 = 365.25;

/// Earth-Sun distance in astronomical units.
///
/// `1 - e cos(0.9856 (doy - 4))`, the argument in degrees.
pub fn earth_sun_distance(day_of_year: f64) -> f64 {
    1.0 - ECCENTRICITY * (0.9856 * (day_of_year - PERIHELION_DAY)).to_radians().cos()
}

/// Elliptical orbit correction for coefficients tabulated at perihelion.
///
/// Ratio of the perihelion distance to the distance on `day_of_year`, with
/// the orbit phase taken over a 365.25 day year. Equals 1 on day 4 and drops
/// to `(1 - e) / (1 + e)` (about 0.967) at aphelion. Total for any real
/// input.
pub fn orbital_correction(day_of_year: f64) -> f64 {
    let phase = 2.0 * PI * (day_of_year - PERIHELION_DAY) / YEAR_LENGTH;
    (1.0 - ECCENTRICITY) / (1.0 - ECCENTRICITY * phase.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_sun_distance_extremes() {
        assert_relative_eq!(earth_sun_distance(4.0), 1.0 - ECCENTRICITY, epsilon = 1e-12);
        // Aphelion falls half an orbit later
        let aphelion = earth_sun_distance(4.0 + 180.0 / 0.9856);
        assert_relative_eq!(aphelion, 1.0 + ECCENTRICITY, epsilon = 1e-12);
    }

    #[test]
    fn test_orbital_correction_peaks_at_perihelion() {
        let peak = orbital_correction(4.0);
        assert!((peak - 1.0).abs() < 0.02);
        for day in 1..=366 {
            assert!(orbital_correction(day as f64) <= peak);
        }
    }

    #[test]
    fn test_orbital_correction_bounds() {
        for tenth in 0..=3660 {
            let value = orbital_correction(tenth as f64 / 10.0);
            assert!((0.966..=1.034).contains(&value), "{value}");
        }
        assert_relative_eq!(
            orbital_correction(4.0 + YEAR_LENGTH / 2.0),
            (1.0 - ECCENTRICITY) / (1.0 + ECCENTRICITY),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_orbital_correction_is_periodic() {
        for day in [1.0, 45.5, 100.0, 183.0, 290.25, 366.0] {
            let shifted = orbital_correction(day + YEAR_LENGTH);
            assert!((orbital_correction(day) - shifted).abs() < 0.01);
        }
    }

    #[test]
    fn test_orbital_correction_total() {
        for day in [-1000.0, 0.0, 1e6] {
            assert!(orbital_correction(day).is_finite());
        }
    }
}
