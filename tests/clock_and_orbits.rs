use approx::assert_abs_diff_eq;
use hifitime::Epoch;

use skyframes::constants::JD_J2000;
use skyframes::elliptical_orbit::EllipticalOrbit;
use skyframes::kepler::solve_kepler_danby;
use skyframes::orb_elem::{Planet, StandishTable};
use skyframes::time::{
    calculate_date, calculate_day_fraction, calculate_gmst, calculate_gmst0, calculate_jd,
    calculate_jd0, Clock,
};

#[test]
fn gmst_at_j2000_noon() {
    let epoch = Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0);
    let fraction = calculate_day_fraction(&epoch);
    let jd0 = calculate_jd0(&epoch);
    assert_eq!(jd0, 2_451_544.5);
    assert_eq!(calculate_jd(fraction, jd0), JD_J2000);

    let gmst = calculate_gmst(fraction, calculate_gmst0(jd0));
    assert_abs_diff_eq!(gmst, 18.697, epsilon = 1e-3);
}

#[test]
fn clock_ticks_round_trip_to_the_same_date() {
    let mut clock = Clock::new();
    for (y, m, d, h, mi) in [
        (1, 1, 1, 0, 0),
        (400, 2, 29, 18, 45),
        (1582, 10, 10, 12, 0),
        (1600, 2, 29, 6, 30),
        (1858, 11, 17, 0, 0),
        (1969, 7, 20, 20, 17),
        (2024, 12, 31, 23, 59),
        (2100, 3, 1, 12, 0),
        (5000, 7, 4, 3, 3),
        (9999, 12, 31, 23, 59),
    ] {
        let epoch = Epoch::from_gregorian_utc(y, m, d, h, mi, 0, 0);
        let tick = clock.tick(epoch);
        let back = calculate_date(tick.jd).unwrap();
        assert!(
            (back - epoch).abs().to_seconds() < 1e-3,
            "{epoch} came back as {back}"
        );
    }
}

#[test]
fn earth_orbit_at_j2000() {
    let elements = StandishTable::From1800AdTo2050Ad.elements(Planet::Earth);
    assert_abs_diff_eq!(elements.at(JD_J2000).eccentricity, 0.01671123, epsilon = 1e-12);

    let orbit = EllipticalOrbit::new(elements).unwrap();
    let r = orbit.orbital_position().coordinates;
    let distance = (r.x() * r.x() + r.y() * r.y()).sqrt();
    assert!((distance - 1.0).abs() < 0.02);
}

#[test]
fn kepler_residual_for_every_planet() {
    for table in [StandishTable::From1800AdTo2050Ad, StandishTable::From3000BcTo3000Ad] {
        for planet in Planet::ALL {
            let el = table.elements(planet).at(2_470_000.5);
            let e = el.eccentricity;
            let m = skyframes::angle::reduce_degrees(el.mean_anomaly);
            let ecc = solve_kepler_danby(m, e).unwrap();
            let residual = ecc - e * ecc.sin() - m.to_radians();
            assert!(residual.abs() < 1e-6, "{planet:?}: {residual}");
        }
    }
}
