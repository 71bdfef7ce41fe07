//! Unit tests for gs-core primitives.

#[cfg(test)]
mod field {
    use crate::{CoreError, Field};

    #[test]
    fn names_round_trip_through_from_str() {
        for &f in Field::ALL {
            assert_eq!(f.name().parse::<Field>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "m_deptj".parse::<Field>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownField(ref n) if n == "m_deptj"));
    }

    #[test]
    fn discriminant_is_index() {
        for (i, &f) in Field::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
        assert_eq!(Field::COUNT, Field::ALL.len());
    }
}

#[cfg(test)]
mod state {
    use approx::assert_relative_eq;

    use crate::{Field, GeoPoint, GliderState};

    fn helgoland() -> GeoPoint {
        GeoPoint::from_nmea(5413.0, 740.5)
    }

    #[test]
    fn seeded_with_initial_values() {
        let gs = GliderState::new(1_000.0, helgoland());
        assert_eq!(gs[Field::Stack], 1.0);
        assert_eq!(gs[Field::CBallastPumped], 230.0);
        assert_eq!(gs[Field::InitDiveTime], 80.0);
        assert_eq!(gs[Field::PresentTime], 1_000.0);
        assert_eq!(gs[Field::MissionStartTime], 1_000.0);
        assert_relative_eq!(gs[Field::Lat], 5413.0, epsilon = 1e-9);
        assert_relative_eq!(gs[Field::Lon], 740.5, epsilon = 1e-9);
    }

    #[test]
    fn set_by_name() {
        let mut gs = GliderState::new(0.0, helgoland());
        gs.set_by_name("u_use_current_correction", 1.0).unwrap();
        assert!(gs.flag(Field::UseCurrentCorrection));
        assert!(gs.set_by_name("not_a_sensor", 1.0).is_err());
    }

    #[test]
    fn reset_origin_moves_frame_to_current_position() {
        let mut gs = GliderState::new(0.0, helgoland());
        let moved = GeoPoint::new(helgoland().lat + 0.01, helgoland().lon);
        let (lat, lon) = moved.to_nmea();
        gs.set(Field::Lat, lat);
        gs.set(Field::Lon, lon);
        gs.set(Field::LmcX, 3.0);
        gs.set(Field::LmcY, 1_100.0);

        gs.reset_origin();
        assert_eq!(gs[Field::LmcX], 0.0);
        assert_eq!(gs[Field::LmcY], 0.0);
        assert_relative_eq!(gs.origin().lat, moved.lat, epsilon = 1e-9);
    }

    #[test]
    fn snapshot_covers_every_field() {
        let gs = GliderState::new(0.0, helgoland());
        assert_eq!(gs.snapshot().count(), Field::COUNT);
    }
}

#[cfg(test)]
mod status {
    use crate::MissionStatus;

    #[test]
    fn raise_is_monotonic() {
        let mut ms = MissionStatus::start();
        ms.raise(MissionStatus::TO_QUIT);
        ms.raise(MissionStatus::IN_PROGRESS);
        assert!(ms.contains(MissionStatus::IN_PROGRESS | MissionStatus::TO_QUIT));
        assert!(!ms.overrides_behaviors());
    }

    #[test]
    fn aborts_override_behaviors() {
        let mut ms = MissionStatus::start();
        ms.raise(MissionStatus::ABORT_OVERDEPTH);
        assert!(ms.is_aborting());
        assert!(ms.overrides_behaviors());

        let mut done = MissionStatus::start();
        done.raise(MissionStatus::COMPLETED);
        assert!(!done.is_aborting());
        assert!(done.overrides_behaviors());
    }
}

#[cfg(test)]
mod geo {
    use approx::assert_relative_eq;

    use crate::geo::{decimal_to_nmea, nmea_to_decimal};
    use crate::{GeoPoint, LocalFrame};

    #[test]
    fn nmea_conversion() {
        assert_relative_eq!(nmea_to_decimal(5430.0), 54.5, epsilon = 1e-12);
        assert_relative_eq!(nmea_to_decimal(-730.0), -7.5, epsilon = 1e-12);
        assert_relative_eq!(decimal_to_nmea(54.5), 5430.0, epsilon = 1e-9);
        assert_relative_eq!(decimal_to_nmea(-7.5), -730.0, epsilon = 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(54.0, 7.0);
        let b = GeoPoint::new(55.0, 7.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn local_frame_axes() {
        let origin = GeoPoint::new(54.0, 7.0);
        let frame = LocalFrame::new(origin);
        let (x, y) = frame.to_local(GeoPoint::new(54.0, 7.01));
        assert!(x > 600.0 && x < 700.0, "east offset {x}");
        assert_relative_eq!(y, 0.0, epsilon = 1e-9);

        let (x, y) = frame.to_local(GeoPoint::new(54.01, 7.0));
        assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        assert!((y - 1_111.95).abs() < 1.0, "north offset {y}");
    }

    #[test]
    fn local_frame_inverse() {
        let frame = LocalFrame::new(GeoPoint::new(54.2, 7.7));
        let p = frame.to_geo(1_234.5, -987.6);
        let (x, y) = frame.to_local(p);
        assert_relative_eq!(x, 1_234.5, epsilon = 1e-6);
        assert_relative_eq!(y, -987.6, epsilon = 1e-6);
    }
}

#[cfg(test)]
mod time {
    use crate::time::{calendar, epoch_from_strings, format_elapsed, minute_start};

    #[test]
    fn date_and_time_parse() {
        let t = epoch_from_strings("20100519", Some("00:30")).unwrap();
        assert_eq!(t, 1_274_229_000.0);
        assert_eq!(calendar(t).unwrap(), (2010, 5, 19, 0, 30));
        assert!(epoch_from_strings("2010-05-19", None).is_err());
    }

    #[test]
    fn minute_start_matches_calendar() {
        assert_eq!(minute_start(2010, 5, 19, 0, 30), Some(1_274_229_000.0));
        assert_eq!(minute_start(2010, 2, 30, 0, 0), None);
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(90_061.0), "day 1 01:01");
    }
}

#[cfg(test)]
mod rng {
    use crate::{RngStream, StreamRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StreamRng::new(7, RngStream::FinNoise);
        let mut b = StreamRng::new(7, RngStream::FinNoise);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0.0..1.0f64), b.gen_range(0.0..1.0f64));
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut a = StreamRng::new(7, RngStream::PumpJitter);
        let mut b = StreamRng::new(7, RngStream::FinJitter);
        let xs: Vec<f64> = (0..8).map(|_| a.gen_range(0.0..1.0)).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.gen_range(0.0..1.0)).collect();
        assert_ne!(xs, ys);
    }
}
