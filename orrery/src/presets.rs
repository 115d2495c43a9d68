use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};

use crate::{
    body::Body,
    constants::{AU, AU_PER_DAY, G_ABS, M_EARTH, M_SUN, SEC_PER_DAY, SEC_PER_YEAR},
    error::{SimError, SimResult},
    parameters::Parameters,
    vector::VectorExt,
};

/// Initial conditions plus the constants they are meant to be run with.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub bodies: Vec<Body>,
    pub parameters: Parameters,
}

pub const PRESETS: &[&str] = &["earth-sun", "solar-system"];

pub fn by_name(name: &str) -> SimResult<Scenario> {
    match name {
        "earth-sun" => earth_sun(),
        "solar-system" => solar_system(),
        other => Err(SimError::config(format!(
            "unknown preset '{other}', expected one of {PRESETS:?}"
        ))),
    }
}

/// Speed of a circular orbit of radius `distance` around `central_mass`.
pub fn circular_speed(g: f64, central_mass: f64, distance: f64) -> f64 {
    (g * central_mass / distance).sqrt()
}

pub fn orbital_period(g: f64, central_mass: f64, distance: f64) -> f64 {
    2.0 * std::f64::consts::PI * (distance.powi(3) / (g * central_mass)).sqrt()
}

/// A body on a circular orbit around `central`, displaced by `offset` in the
/// xy-plane and moving counter-clockwise around +z.
pub fn circular_orbit(
    central: &Body,
    name: impl Into<String>,
    mass: f64,
    offset: Vector3<f64>,
    g: f64,
) -> SimResult<Body> {
    let name = name.into();
    let tangent = Vector3::unit_z()
        .cross(offset)
        .try_normalize()
        .map_err(|_| SimError::config(format!("'{name}' needs an offset in the xy-plane")))?;
    let speed = circular_speed(g, central.mass(), offset.magnitude());
    Body::new(
        name,
        mass,
        central.position() + offset,
        central.velocity() + tangent * speed,
    )
}

/// Sun at rest at the origin and earth on a circular orbit at 1 AU, run for one year.
pub fn earth_sun() -> SimResult<Scenario> {
    let sun = Body::new("sun", M_SUN, Point3::origin(), Vector3::zero())?;
    let earth = circular_orbit(&sun, "earth", M_EARTH, Vector3::new(AU, 0.0, 0.0), G_ABS)?
        // A circular orbit returns to where it started
        .with_expected_final_position(Point3::new(AU, 0.0, 0.0))?;

    Ok(Scenario {
        name: "earth-sun",
        bodies: vec![sun, earth],
        parameters: Parameters::default()
            .with_time_step(3600.0)
            .with_time_horizon(SEC_PER_YEAR),
    })
}

struct Ephemeris {
    name: &'static str,
    mass: f64,
    /// AU
    pos: [f64; 3],
    /// AU/day
    vel: [f64; 3],
    /// AU, 62 days later
    expected: Option<[f64; 3]>,
}

fn au(v: [f64; 3]) -> Point3<f64> {
    Point3::new(v[0] * AU, v[1] * AU, v[2] * AU)
}

#[allow(clippy::excessive_precision)] // Copy-pasted from ephemeris tables
const SOLAR_SYSTEM: [Ephemeris; 9] = [
    Ephemeris {
        name: "mercury",
        mass: 0.330e24,
        pos: [8.913114680709093e-02, -4.372419157899412e-01, -4.490119216656256e-02],
        vel: [2.185141852877879E-02, 7.372045148285450E-03, -1.401990385943134E-03],
        expected: Some([-3.850312265017665E-01, -1.926006814708216E-01, 1.859066992820886E-02]),
    },
    Ephemeris {
        name: "venus",
        mass: 4.87e24,
        pos: [-5.542779097496149E-01, -4.655986864429679E-01, 2.523580746577695E-02],
        vel: [1.304891101840036E-02, -1.542812943586152E-02, -9.648266418927268E-04],
        expected: Some([5.426318315886154E-01, -4.704547201932487E-01, -3.813448111774523E-02]),
    },
    Ephemeris {
        name: "earth",
        mass: M_EARTH,
        pos: [-6.432564930720717E-02, 9.878384958400993E-01, 6.032515598783565E-05],
        vel: [-1.745808117294628E-02, -1.085296673766881E-03, -1.397471147541368E-07],
        expected: Some([-9.134415575954500E-01, 4.033038777291573E-01, 9.917860660597218E-05]),
    },
    Ephemeris {
        name: "mars",
        mass: 0.642e24,
        pos: [6.984679242003360E-01, 1.330211951230428E+00, 1.055726692621145E-02],
        vel: [-1.182832576496634E-02, 7.761379167524576E-03, 4.529782513085336E-04],
        expected: Some([-1.072298827442317E-01, 1.580544766284500E+00, 3.557861048482098E-02]),
    },
    Ephemeris {
        name: "jupiter",
        mass: 1898e24,
        pos: [2.992922263074153E+00, -4.115952876210287E+00, -4.988501139322823E-02],
        vel: [6.009296695763082E-03, 4.795484796505474E-03, -1.543546721793127E-04],
        expected: Some([3.352101393139451E+00, -3.801327001825503E+00, -5.922553131465192E-02]),
    },
    Ephemeris {
        name: "saturn",
        mass: 568e24,
        pos: [5.453217038160517E+00, -8.357423201558433E+00, -7.178682582575581E-02],
        vel: [4.361109937668995E-03, 3.034070080435694E-03, -2.260656042767609E-04],
        expected: Some([5.720427343137351E+00, -8.164503864316774E+00, -8.578268533269506E-02]),
    },
    Ephemeris {
        name: "uranus",
        mass: 86.8e24,
        pos: [1.536093386282575E+01, 1.244750867737449E+01, -1.527725865319626E-01],
        vel: [-2.505190458241792E-03, 2.872516306433058E-03, 4.296278557535833E-05],
        expected: Some([1.520448976903749E+01, 1.262468340988623E+01, -1.500875761465619E-01]),
    },
    Ephemeris {
        name: "neptune",
        mass: 102e24,
        pos: [2.945017335057748E+01, -5.247585957567249E+00, -5.706457269763382E-01],
        vel: [5.294906303642744E-04, 3.108721711486407E-03, -7.627988070832003E-05],
        expected: Some([2.948239806625153E+01, -5.054711299702682E+00, -5.753594785865234E-01]),
    },
    Ephemeris {
        name: "pluto",
        mass: 0.0146e24,
        pos: [1.403341614117954E+01, -3.115664704776420E+01, -7.253382231337110E-01],
        vel: [2.943881848867979E-03, 6.268437089847535E-04, -9.118518513203218E-04],
        expected: None,
    },
];

/// The sun and nine planets on 2020-12-25, validated 62 days later.
pub fn solar_system() -> SimResult<Scenario> {
    let mut bodies = Vec::with_capacity(SOLAR_SYSTEM.len() + 1);
    bodies.push(Body::new("sun", M_SUN, Point3::origin(), Vector3::zero())?);

    for eph in &SOLAR_SYSTEM {
        let vel = Vector3::from(eph.vel) * AU_PER_DAY;
        let mut body = Body::new(eph.name, eph.mass, au(eph.pos), vel)?;
        if let Some(expected) = eph.expected {
            body = body.with_expected_final_position(au(expected))?;
        }
        bodies.push(body);
    }

    Ok(Scenario {
        name: "solar-system",
        bodies,
        parameters: Parameters::default()
            .with_time_step(1000.0)
            .with_time_horizon(62.0 * SEC_PER_DAY),
    })
}
