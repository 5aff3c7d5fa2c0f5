//! Weather collaborator interface.

use sr_core::GeoPoint;

/// Supplies cloud cover (percent, 0–100) along the route.
///
/// Values outside `[0, 100]` are passed through untouched and rejected by
/// the irradiance model, so a misbehaving forecast source fails loudly.
pub trait Weather: Send + Sync {
    fn cloud_cover(&self, coord: GeoPoint, elapsed_secs: u64) -> f64;
}

impl<T: Weather + ?Sized> Weather for Box<T> {
    fn cloud_cover(&self, coord: GeoPoint, elapsed_secs: u64) -> f64 {
        (**self).cloud_cover(coord, elapsed_secs)
    }
}

/// Cloudless sky everywhere, always.
#[derive(Copy, Clone, Debug, Default)]
pub struct ClearSky;

impl Weather for ClearSky {
    fn cloud_cover(&self, _coord: GeoPoint, _elapsed_secs: u64) -> f64 {
        0.0
    }
}

/// The same cloud cover everywhere, always.
#[derive(Copy, Clone, Debug)]
pub struct UniformCloudCover(pub f64);

impl Weather for UniformCloudCover {
    fn cloud_cover(&self, _coord: GeoPoint, _elapsed_secs: u64) -> f64 {
        self.0
    }
}

/// Hour-by-hour forecast from the start of the simulation.
///
/// The last value persists past the end of the forecast; an empty forecast
/// is a clear sky.
#[derive(Clone, Debug, Default)]
pub struct HourlyCloudCover {
    pub hourly: Vec<f64>,
}

impl HourlyCloudCover {
    pub fn new(hourly: Vec<f64>) -> Self {
        Self { hourly }
    }
}

impl Weather for HourlyCloudCover {
    fn cloud_cover(&self, _coord: GeoPoint, elapsed_secs: u64) -> f64 {
        let hour = (elapsed_secs / 3_600) as usize;
        self.hourly
            .get(hour)
            .or_else(|| self.hourly.last())
            .copied()
            .unwrap_or(0.0)
    }
}
