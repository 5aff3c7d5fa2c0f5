//! Unit tests for sr-environment.

#[cfg(test)]
mod solar_time {
    use approx::assert_relative_eq;

    use crate::solar_time::{declination_angle, equation_of_time, local_time_to_apparent_solar_time};

    #[test]
    fn equation_of_time_at_reference_day() {
        assert_relative_eq!(equation_of_time(81.0), -7.53, epsilon = 1e-12);
    }

    #[test]
    fn apparent_time_on_the_meridian() {
        let lst = local_time_to_apparent_solar_time(-6.0, 81.0, 12.0, -90.0);
        assert_relative_eq!(lst, 12.0 - 7.53 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn apparent_time_shifts_four_minutes_per_degree() {
        let a = local_time_to_apparent_solar_time(0.0, 100.0, 10.0, 0.0);
        let b = local_time_to_apparent_solar_time(0.0, 100.0, 10.0, 1.0);
        assert_relative_eq!(b - a, 4.0 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn declination_extremes() {
        assert!(declination_angle(172.0) > 23.0);
        assert!(declination_angle(355.0) < -23.0);
        assert!(declination_angle(81.0).abs() < 1.0);
    }
}

#[cfg(test)]
mod solar {
    use approx::assert_relative_eq;
    use sr_core::GeoPoint;

    use crate::{EnvironmentError, IrradianceSample, SolarCalculations};

    fn sample(local_time: f64, cloud_cover: f64, driving: bool) -> IrradianceSample {
        IrradianceSample {
            coord: GeoPoint::new(37.0, -95.0),
            utc_offset_hours: -6.0,
            day_of_year: 190,
            local_time,
            elevation_m: 300.0,
            cloud_cover,
            driving,
        }
    }

    #[test]
    fn ghi_is_exactly_zero_at_and_below_horizon() {
        let solar = SolarCalculations::new();
        assert_eq!(solar.ghi(90.0, 0.0), 0.0);
        assert_eq!(solar.ghi(120.0, 1_500.0), 0.0);
        assert_eq!(solar.angled_irradiance(95.0, 0.0), 0.0);
        assert_eq!(solar.dni(96.5, 0.0), 0.0);
    }

    #[test]
    fn night_masking_over_a_grid() {
        let solar = SolarCalculations::new();
        let mut night = 0;
        for lat in [-60.0, -20.0, 0.0, 35.0, 70.0] {
            for lon in [-150.0, -80.0, 0.0, 120.0] {
                for day in [1, 81, 172, 266, 355] {
                    for hour in 0..24 {
                        let coord = GeoPoint::new(lat, lon);
                        let tz = (lon / 15.0_f64).round();
                        let zenith = solar.zenith_angle(coord, tz, day, hour as f64);
                        let ghi = solar.ghi(zenith, 200.0);
                        assert!(ghi.is_finite());
                        if zenith >= 90.0 {
                            night += 1;
                            assert_eq!(ghi, 0.0, "lat {lat} lon {lon} day {day} hour {hour}");
                            assert_eq!(solar.angled_irradiance(zenith, 200.0), 0.0);
                        } else {
                            assert!(ghi > 0.0);
                        }
                    }
                }
            }
        }
        assert!(night > 0);
    }

    #[test]
    fn high_sun_is_bright() {
        let solar = SolarCalculations::new();
        // Equator at the March equinox, apparent solar noon.
        let coord = GeoPoint::new(0.0, 0.0);
        let noon = 12.0 + 7.53 / 60.0;
        assert!(solar.elevation_angle(coord, 0.0, 81, noon) > 85.0);
        let zenith = solar.zenith_angle(coord, 0.0, 81, noon);
        let ghi = solar.ghi(zenith, 0.0);
        assert!(ghi > 900.0 && ghi < 1_353.0, "ghi {ghi}");
    }

    #[test]
    fn altitude_raises_dni() {
        let solar = SolarCalculations::new();
        assert!(solar.dni(40.0, 2_000.0) > solar.dni(40.0, 0.0));
    }

    #[test]
    fn cloud_cover_attenuation_endpoints() {
        let solar = SolarCalculations::new();
        let ghi = solar.ghi(35.0, 100.0);
        assert_eq!(solar.apply_cloud_cover(ghi, 0.0).unwrap(), ghi);
        assert_eq!(solar.apply_cloud_cover(ghi, 100.0).unwrap(), 0.25 * ghi);
        let half = solar.apply_cloud_cover(ghi, 50.0).unwrap();
        assert!(half < ghi && half > 0.25 * ghi);
    }

    #[test]
    fn cloud_cover_out_of_range_is_rejected() {
        let solar = SolarCalculations::new();
        assert!(matches!(solar.apply_cloud_cover(500.0, -1.0), Err(EnvironmentError::CloudCover(_))));
        assert!(solar.apply_cloud_cover(500.0, 100.5).is_err());
        assert!(solar.apply_cloud_cover(500.0, f64::NAN).is_err());
    }

    #[test]
    fn tilted_array_beats_flat_when_sun_is_low() {
        let solar = SolarCalculations::new();
        assert!(solar.angled_irradiance(60.0, 0.0) > solar.ghi(60.0, 0.0));
        // A zenith equal to a mount angle sees the full beam.
        let dni = solar.dni(30.0, 0.0);
        assert_relative_eq!(solar.angled_irradiance(30.0, 0.0), 1.1 * dni, epsilon = 1e-9);
    }

    #[test]
    fn flat_only_mount_matches_ghi() {
        let solar = SolarCalculations::new().with_mount_angles(&[0.0]);
        assert_relative_eq!(solar.angled_irradiance(50.0, 0.0), solar.ghi(50.0, 0.0));
    }

    #[test]
    fn selection_by_driving_flag() {
        let solar = SolarCalculations::new();
        let driving = solar.effective_irradiance(&sample(16.0, 0.0, true)).unwrap();
        let parked = solar.effective_irradiance(&sample(16.0, 0.0, false)).unwrap();
        assert!(parked > driving);

        let series = solar
            .calculate_array_ghi(&[sample(16.0, 0.0, true), sample(16.0, 0.0, false), sample(2.0, 0.0, false)])
            .unwrap();
        assert_eq!(series, [driving, parked, 0.0]);
    }

    #[test]
    fn array_rejects_bad_cloud_cover() {
        let solar = SolarCalculations::new();
        assert!(solar.calculate_array_ghi(&[sample(12.0, 10.0, true), sample(12.0, 140.0, true)]).is_err());
    }

    #[test]
    fn azimuth_east_in_morning_west_in_afternoon() {
        let solar = SolarCalculations::new();
        let coord = GeoPoint::new(40.0, 0.0);
        let morning = solar.azimuth_angle(coord, 0.0, 172, 9.0);
        let afternoon = solar.azimuth_angle(coord, 0.0, 172, 15.0);
        assert!(morning > 0.0 && morning < 180.0, "morning {morning}");
        assert!(afternoon > 180.0 && afternoon < 360.0, "afternoon {afternoon}");
    }
}

#[cfg(test)]
mod route {
    use approx::assert_relative_eq;
    use sr_core::GeoPoint;

    use crate::{FlatRoute, RouteProfile, WaypointRoute};

    fn straight(elevations: Option<Vec<f64>>, looped: bool) -> WaypointRoute {
        WaypointRoute::new(
            GeoPoint::new(30.0, -90.0),
            &[GeoPoint::new(30.1, -90.0)],
            GeoPoint::new(30.2, -90.0),
            elevations,
            -6.0,
            looped,
        )
        .unwrap()
    }

    #[test]
    fn length_and_endpoints() {
        let r = straight(None, false);
        let len = r.length_m().unwrap();
        assert!((len - 22_239.0).abs() < 50.0, "len {len}");
        assert_eq!(r.sample(0.0).coord, GeoPoint::new(30.0, -90.0));
        let end = r.sample(len).coord;
        assert_relative_eq!(end.lat, 30.2, epsilon = 1e-9);
        // Past the end stays at the finish.
        assert_relative_eq!(r.sample(len * 3.0).coord.lat, 30.2, epsilon = 1e-9);
    }

    #[test]
    fn interpolates_elevation_and_grade() {
        let r = straight(Some(vec![0.0, 100.0, 50.0]), false);
        let half = r.lap_length_m() / 2.0;
        let first = r.sample(half / 2.0);
        assert_relative_eq!(first.elevation_m, 50.0, epsilon = 0.5);
        assert!(first.grade > 0.0);
        let second = r.sample(half * 1.5);
        assert!(second.grade < 0.0);
        assert_relative_eq!(second.elevation_m, 75.0, epsilon = 0.5);
        assert_eq!(second.utc_offset_hours, -6.0);
    }

    #[test]
    fn elevation_count_must_match_vertices() {
        let err = WaypointRoute::new(
            GeoPoint::new(30.0, -90.0),
            &[],
            GeoPoint::new(30.2, -90.0),
            Some(vec![1.0, 2.0, 3.0]),
            -6.0,
            false,
        );
        assert!(err.is_err());
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let err = WaypointRoute::new(GeoPoint::new(95.0, 0.0), &[], GeoPoint::new(0.0, 0.0), None, 0.0, false);
        assert!(err.is_err());
    }

    #[test]
    fn looped_route_wraps() {
        let r = straight(None, true);
        assert!(r.is_looped());
        assert_eq!(r.length_m(), None);
        let lap = r.lap_length_m();
        let a = r.sample(1_000.0).coord;
        let b = r.sample(lap + 1_000.0).coord;
        assert_relative_eq!(a.lat, b.lat, epsilon = 1e-9);
        assert_relative_eq!(a.lon, b.lon, epsilon = 1e-9);
    }

    #[test]
    fn flat_route_is_endless() {
        let r = FlatRoute::new(GeoPoint::new(40.0, -100.0), 500.0, -6.0);
        assert_eq!(r.length_m(), None);
        let p = r.sample(1.0e9);
        assert_eq!(p.grade, 0.0);
        assert_eq!(p.elevation_m, 500.0);
        let boxed: Box<dyn RouteProfile> = Box::new(r);
        assert_eq!(boxed.sample(5.0), p);
    }
}

#[cfg(test)]
mod weather {
    use sr_core::GeoPoint;

    use crate::{ClearSky, HourlyCloudCover, UniformCloudCover, Weather};

    const HERE: GeoPoint = GeoPoint { lat: 0.0, lon: 0.0 };

    #[test]
    fn fixed_sources() {
        assert_eq!(ClearSky.cloud_cover(HERE, 10), 0.0);
        assert_eq!(UniformCloudCover(40.0).cloud_cover(HERE, 99_999), 40.0);
    }

    #[test]
    fn hourly_lookup_persists_last_value() {
        let w = HourlyCloudCover::new(vec![10.0, 20.0, 30.0]);
        assert_eq!(w.cloud_cover(HERE, 0), 10.0);
        assert_eq!(w.cloud_cover(HERE, 3_599), 10.0);
        assert_eq!(w.cloud_cover(HERE, 3_600), 20.0);
        assert_eq!(w.cloud_cover(HERE, 50_000), 30.0);
        assert_eq!(HourlyCloudCover::default().cloud_cover(HERE, 0), 0.0);
    }

    #[test]
    fn boxed_weather_delegates() {
        let w: Box<dyn Weather> = Box::new(UniformCloudCover(12.5));
        assert_eq!(w.cloud_cover(HERE, 0), 12.5);
    }
}
