//! Comparison of observed positions against reference positions at the horizon.
//!
//! Only magnitudes are compared: a body on the right sphere but on the wrong
//! side of it shows no deviation.

use std::fmt::Display;

use cgmath::{EuclideanSpace, InnerSpace, Point3};

use crate::{body::Body, sim::format_elapsed};

#[derive(Debug, Clone, PartialEq)]
pub struct Deviation {
    pub name: String,
    pub observed: Point3<f64>,
    pub expected: Point3<f64>,
    pub deviation_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub step: u64,
    pub elapsed: f64,
    /// One entry per body with a reference position, in body order.
    pub entries: Vec<Deviation>,
}

/// `| |observed| - |expected| | / |expected| * 100`
pub fn deviation_percent(observed: Point3<f64>, expected: Point3<f64>) -> f64 {
    let observed = observed.to_vec().magnitude();
    let expected = expected.to_vec().magnitude();
    (observed - expected).abs() / expected * 100.0
}

pub fn validate(bodies: &[Body], step: u64, elapsed: f64) -> ValidationReport {
    let entries = bodies
        .iter()
        .filter_map(|body| {
            let expected = body.expected_final_position()?;
            Some(Deviation {
                name: body.name().to_owned(),
                observed: body.position(),
                expected,
                deviation_percent: deviation_percent(body.position(), expected),
            })
        })
        .collect();

    ValidationReport {
        step,
        elapsed,
        entries,
    }
}

impl ValidationReport {
    pub fn get(&self, name: &str) -> Option<&Deviation> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn max_deviation(&self) -> Option<&Deviation> {
        self.entries
            .iter()
            .max_by(|a, b| a.deviation_percent.total_cmp(&b.deviation_percent))
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Validation at step {} ({})",
            self.step,
            format_elapsed(self.elapsed)
        )?;
        for d in &self.entries {
            writeln!(
                f,
                "  {:<10} observed ({:.6e}, {:.6e}, {:.6e}) expected ({:.6e}, {:.6e}, {:.6e}) deviation {:.4}%",
                d.name,
                d.observed.x,
                d.observed.y,
                d.observed.z,
                d.expected.x,
                d.expected.y,
                d.expected.z,
                d.deviation_percent
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector3, Zero};

    use super::*;

    #[test]
    fn compares_magnitudes_only() {
        let expected = Point3::new(3.0, 4.0, 0.0);
        // Same distance from the origin, opposite side
        assert_eq!(deviation_percent(Point3::new(-5.0, 0.0, 0.0), expected), 0.0);
        assert!((deviation_percent(Point3::new(0.0, 5.5, 0.0), expected) - 10.0).abs() < 1e-12);
        assert!((deviation_percent(Point3::new(0.0, 4.5, 0.0), expected) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn skips_bodies_without_reference() {
        let bodies = vec![
            Body::new("sun", 1.0, Point3::origin(), Vector3::zero()).unwrap(),
            Body::new("earth", 1.0, Point3::new(2.0, 0.0, 0.0), Vector3::zero())
                .unwrap()
                .with_expected_final_position(Point3::new(1.0, 0.0, 0.0))
                .unwrap(),
            Body::new("mars", 1.0, Point3::new(1.5, 0.0, 0.0), Vector3::zero())
                .unwrap()
                .with_expected_final_position(Point3::new(0.0, 1.5, 0.0))
                .unwrap(),
        ];
        let report = validate(&bodies, 7, 70.0);
        assert_eq!(report.entries.len(), 2);
        assert!(report.get("sun").is_none());
        assert!((report.get("earth").unwrap().deviation_percent - 100.0).abs() < 1e-12);
        assert_eq!(report.max_deviation().unwrap().name, "earth");

        let text = report.to_string();
        assert!(text.contains("earth"));
        assert!(text.contains("100.0000%"));
    }
}
