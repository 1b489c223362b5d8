//! Solar geometry for an observation: day of year, declination and zenith
//! angle, plus the Earth-Sun distance terms in [`orbit`].

use chrono::{Datelike, NaiveDateTime, Timelike};

pub mod orbit;

pub use orbit::{earth_sun_distance, orbital_correction};

// Mean daily motion of the Earth along its orbit, degrees per day
const DEGREES_PER_DAY: f64 = 0.985653269;
const AXIAL_TILT_DEG: f64 = 23.44;

/// Day of year, 1 on January 1st.
pub fn day_of_year(date: NaiveDateTime) -> u32 {
    date.ordinal()
}

/// Solar declination angle in degrees.
///
/// Includes the first-order eccentricity term, which moves the result
/// by up to ~2° against the plain cosine approximation.
pub fn solar_declination(day_of_year: f64) -> f64 {
    let n = day_of_year - 1.0;
    let solstice = (n + 10.0) * DEGREES_PER_DAY;
    let eccentricity = 1.913679036 * ((n - 2.0) * DEGREES_PER_DAY).to_radians().sin();

    ((-AXIAL_TILT_DEG).to_radians().sin() * (solstice + eccentricity).to_radians().cos())
        .asin()
        .to_degrees()
}

/// Solar zenith angle in degrees for a UTC time and a position in degrees.
pub fn sun_zenith_angle(date: NaiveDateTime, longitude: f64, latitude: f64) -> f64 {
    let day_of_year = date.ordinal() as f64;

    // Hour angle from local solar time
    let time_of_day = date.num_seconds_from_midnight() as f64 / 3600.0;
    let solar_time = time_of_day + (4.0 * longitude) / 60.0;
    let hour_angle = 15.0 * (solar_time - 12.0);

    let latitude_rad = latitude.to_radians();
    let declination_rad = solar_declination(day_of_year).to_radians();

    let cos_zenith = latitude_rad.sin() * declination_rad.sin()
        + latitude_rad.cos() * declination_rad.cos() * hour_angle.to_radians().cos();

    // Rounding can push the cosine a hair past 1 when the sun is overhead
    cos_zenith.clamp(-1.0, 1.0).acos().to_degrees()
}
