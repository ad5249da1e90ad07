//! # Fitted planetary orbital elements
//!
//! Keplerian elements of the major planets as published by E. M. Standish (JPL,
//! "Keplerian Elements for Approximate Positions of the Major Planets"). Each element is a
//! value at J2000 plus a linear rate per Julian century; the long-span table adds a periodic
//! correction to the mean anomaly of Jupiter through Pluto.
//!
//! Two tables are available through [`StandishTable`]:
//!
//! | Table                                   | Validity         | Extra terms |
//! |-----------------------------------------|------------------|-------------|
//! | [`StandishTable::From3000BcTo3000Ad`]   | 3000 BC–3000 AD  | Jupiter–Pluto |
//! | [`StandishTable::From1800AdTo2050Ad`]   | 1800 AD–2050 AD  | none        |
//!
//! Angles are in degrees, the semi-major axis in AU. The "perihelion" entry is the
//! longitude of perihelion `ϖ = Ω + ω`, not the argument.

use serde::{Deserialize, Serialize};

use crate::constants::{AstronomicalUnit, Degree, JulianDate, DAYS_PER_JULIAN_CENTURY, JD_J2000, RADEG};

/// An element varying linearly with time: `value + rate·T`, `T` in Julian centuries since J2000.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecularElement {
    pub value: f64,
    pub rate: f64,
}

impl SecularElement {
    pub const fn new(value: f64, rate: f64) -> Self {
        SecularElement { value, rate }
    }

    pub fn at(&self, centuries: f64) -> f64 {
        self.value + centuries * self.rate
    }
}

/// Mean anomaly correction `b·T² + c·cos(f·T) + s·sin(f·T)`, with `f·T` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTerms {
    pub b: f64,
    pub c: f64,
    pub s: f64,
    pub f: f64,
}

impl PeriodicTerms {
    pub const fn new(b: f64, c: f64, s: f64, f: f64) -> Self {
        PeriodicTerms { b, c, s, f }
    }

    pub fn correction(&self, centuries: f64) -> Degree {
        let ft = self.f * centuries * RADEG;
        self.b * centuries * centuries + self.c * ft.cos() + self.s * ft.sin()
    }
}

/// Elements of one body, immutable reference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub semi_major_axis: SecularElement,
    pub eccentricity: SecularElement,
    pub inclination: SecularElement,
    pub mean_longitude: SecularElement,
    pub longitude_of_perihelion: SecularElement,
    pub longitude_of_ascending_node: SecularElement,
    pub extra: Option<PeriodicTerms>,
}

/// Elements evaluated at one Julian Date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstantElements {
    pub semi_major_axis: AstronomicalUnit,
    pub eccentricity: f64,
    pub inclination: Degree,
    pub mean_longitude: Degree,
    pub longitude_of_perihelion: Degree,
    pub longitude_of_ascending_node: Degree,
    /// `L − ϖ` plus the periodic correction, not reduced.
    pub mean_anomaly: Degree,
}

impl OrbitalElements {
    /// Interpolate every element at `jd`.
    pub fn at(&self, jd: JulianDate) -> InstantElements {
        let t = (jd - JD_J2000) / DAYS_PER_JULIAN_CENTURY;

        let mean_longitude = self.mean_longitude.at(t);
        let longitude_of_perihelion = self.longitude_of_perihelion.at(t);
        let correction = self.extra.map_or(0.0, |extra| extra.correction(t));

        InstantElements {
            semi_major_axis: self.semi_major_axis.at(t),
            eccentricity: self.eccentricity.at(t),
            inclination: self.inclination.at(t),
            mean_longitude,
            longitude_of_perihelion,
            longitude_of_ascending_node: self.longitude_of_ascending_node.at(t),
            mean_anomaly: mean_longitude - longitude_of_perihelion + correction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandishTable {
    From3000BcTo3000Ad,
    #[default]
    From1800AdTo2050Ad,
}

impl StandishTable {
    pub fn elements(self, planet: Planet) -> OrbitalElements {
        match self {
            StandishTable::From3000BcTo3000Ad => FROM_3000BC_TO_3000AD[planet.index()],
            StandishTable::From1800AdTo2050Ad => FROM_1800AD_TO_2050AD[planet.index()],
        }
    }
}

const fn elements(
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    l: [f64; 2],
    peri: [f64; 2],
    node: [f64; 2],
    extra: Option<PeriodicTerms>,
) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: SecularElement::new(a[0], a[1]),
        eccentricity: SecularElement::new(e[0], e[1]),
        inclination: SecularElement::new(i[0], i[1]),
        mean_longitude: SecularElement::new(l[0], l[1]),
        longitude_of_perihelion: SecularElement::new(peri[0], peri[1]),
        longitude_of_ascending_node: SecularElement::new(node[0], node[1]),
        extra,
    }
}

#[rustfmt::skip]
static FROM_3000BC_TO_3000AD: [OrbitalElements; 9] = [
    // Mercury
    elements([0.38709843, 0.0], [0.20563661, 0.00002123], [7.00559432, -0.00590158],
             [252.25166724, 149472.67486623], [77.45771895, 0.15940013], [48.33961819, -0.12214182], None),
    // Venus
    elements([0.72332102, -0.00000026], [0.00676399, -0.00005107], [3.39777545, 0.00043494],
             [181.9797085, 58517.8156026], [131.76755713, 0.05679648], [76.67261496, -0.27274174], None),
    // Earth
    elements([1.00000018, -0.00000003], [0.01673163, -0.00003661], [-0.00054346, -0.01337178],
             [100.46691572, 35999.37306329], [102.93005885, 0.3179526], [-5.11260389, -0.24123856], None),
    // Mars
    elements([1.52371243, 0.00000097], [0.09336511, 0.00009149], [1.85181869, -0.00724757],
             [-4.56813164, 19140.29934243], [-23.91744784, 0.45223625], [49.71320984, -0.26852431], None),
    // Jupiter
    elements([5.20248019, -0.00002864], [0.0485359, 0.00018026], [1.29861416, -0.00322699],
             [34.33479152, 3034.90371757], [14.27495244, 0.18199196], [100.29282654, 0.13024619],
             Some(PeriodicTerms::new(-0.00012452, 0.0606406, -0.35635438, 38.35125))),
    // Saturn
    elements([9.54149883, -0.00003065], [0.05550825, -0.00032044], [2.49424102, 0.00451969],
             [50.07571329, 1222.11494724], [92.86136063, 0.54179478], [113.63998702, -0.25015002],
             Some(PeriodicTerms::new(0.00025899, -0.13434469, 0.87320147, 38.35125))),
    // Uranus
    elements([19.18797948, -0.00020455], [0.0468574, -0.0000155], [0.77298127, -0.00180155],
             [314.20276625, 428.49512595], [172.43404441, 0.09266985], [73.96250215, 0.05739699],
             Some(PeriodicTerms::new(0.00058331, -0.97731848, 0.17689245, 7.67025))),
    // Neptune
    elements([30.06952752, 0.00006447], [0.00895439, 0.00000818], [1.7700552, 0.000224],
             [304.22289287, 218.46515314], [46.68158724, 0.01009938], [131.78635853, -0.00606302],
             Some(PeriodicTerms::new(-0.00041348, 0.68346318, -0.10162547, 7.67025))),
    // Pluto
    elements([39.48686035, 0.00449751], [0.24885238, 0.00006016], [17.1410426, 0.00000501],
             [238.96535011, 145.18042903], [224.09702598, -0.00968827], [110.30167986, -0.00809981],
             Some(PeriodicTerms::new(-0.01262724, 0.0, 0.0, 0.0))),
];

#[rustfmt::skip]
static FROM_1800AD_TO_2050AD: [OrbitalElements; 9] = [
    // Mercury
    elements([0.38709927, 0.00000037], [0.20563593, 0.00001906], [7.00497902, -0.00594749],
             [252.2503235, 149472.67411175], [77.45779628, 0.16047689], [48.33076593, -0.12534081], None),
    // Venus
    elements([0.72333566, 0.00000390], [0.00677672, -0.00004107], [3.39467605, -0.0007889],
             [181.9790995, 58517.81538729], [131.60246718, 0.00268329], [76.67984255, -0.27769418], None),
    // Earth
    elements([1.00000261, 0.00000562], [0.01671123, -0.00004392], [-0.00001531, -0.01294668],
             [100.46457166, 35999.37244981], [102.93768193, 0.32327364], [0.0, 0.0], None),
    // Mars
    elements([1.52371034, 0.00001847], [0.0933941, 0.00007882], [1.84969142, -0.00813131],
             [-4.55343205, 19140.30268499], [-23.94362959, 0.44441088], [49.55953891, -0.29257343], None),
    // Jupiter
    elements([5.202887, -0.00011607], [0.04838624, -0.00013253], [1.30439695, -0.00183714],
             [34.39644051, 3034.74612775], [14.72847983, 0.21252668], [100.47390909, 0.20469106], None),
    // Saturn
    elements([9.53667594, -0.0012506], [0.05386179, -0.00050991], [2.48599187, 0.00193609],
             [49.95424423, 1222.49362201], [92.59887831, -0.41897216], [113.66242448, -0.28867794], None),
    // Uranus
    elements([19.18916464, -0.00196176], [0.04725744, -0.00004397], [0.77263783, -0.00242939],
             [313.23810451, 428.48202785], [170.9542763, 0.40805281], [74.01692503, 0.04240589], None),
    // Neptune
    elements([30.06992276, 0.00026291], [0.00859048, 0.00005105], [1.77004347, 0.00035372],
             [-55.12002969, 218.45945325], [44.96476227, -0.3224146], [131.78422574, -0.00508664], None),
    // Pluto
    elements([39.48211675, -0.00031596], [0.2488273, 0.0000517], [17.14001206, 0.00004818],
             [238.92903833, 145.20780515], [224.06891629, -0.04062942], [110.30393684, -0.01183482], None),
];
