use std::sync::Arc;

use approx::assert_abs_diff_eq;
use hifitime::Epoch;
use skyframes::coordinates::EquatorialCoordinates;
use skyframes::observatory::{ObservatoryBuilder, ObservatoryState};
use skyframes::time::ClockTick;

pub fn observatory_at(latitude: f64, longitude: f64, epoch: Epoch) -> Arc<ObservatoryState> {
    ObservatoryBuilder::new()
        .latitude(latitude)
        .longitude(longitude)
        .clock_tick(Arc::new(ClockTick::from_epoch(epoch)))
        .build()
        .unwrap()
        .state()
}

/// Compare two equatorial positions; right ascension is compared across the 0h/24h seam.
pub fn assert_equatorial_close(
    actual: &EquatorialCoordinates,
    expected: &EquatorialCoordinates,
    epsilon: f64,
) {
    let mut dra = actual.right_ascension - expected.right_ascension;
    if dra > 12.0 {
        dra -= 24.0;
    } else if dra < -12.0 {
        dra += 24.0;
    }
    assert_abs_diff_eq!(dra, 0.0, epsilon = epsilon);
    assert_abs_diff_eq!(actual.declination, expected.declination, epsilon = epsilon);
}
