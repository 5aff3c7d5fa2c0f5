//! Solar-time helpers.
//!
//! Reference: <https://www.pveducation.org/pvcdrom/properties-of-sunlight/solar-time>

/// Equation of time (minutes) for `day_of_year` (1 = January 1).
pub fn equation_of_time(day_of_year: f64) -> f64 {
    let b = (360.0 / 365.0 * (day_of_year - 81.0)).to_radians();
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Apparent solar time (hours) from local clock time.
///
/// `utc_offset_hours` is the standard-time zone offset (Vancouver: −8);
/// `longitude` is in degrees, positive east.  If both local time and the
/// offset are left unadjusted for daylight saving the result is the same.
pub fn local_time_to_apparent_solar_time(
    utc_offset_hours: f64,
    day_of_year: f64,
    local_time: f64,
    longitude: f64,
) -> f64 {
    let meridian = 15.0 * utc_offset_hours;
    let correction_min = 4.0 * (longitude - meridian) + equation_of_time(day_of_year);
    local_time + correction_min / 60.0
}

/// Solar declination (degrees) for `day_of_year`.
///
/// Negative in northern winter, zero at the equinoxes, positive in summer.
pub fn declination_angle(day_of_year: f64) -> f64 {
    -23.4523 * (360.0 / 365.0 * (day_of_year + 10.0)).to_radians().cos()
}
