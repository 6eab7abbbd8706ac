#![allow(dead_code)]

use std::fmt::Write as _;

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use nalgebra::Vector3;
use tempfile::TempDir;

use daisy::decomposition::GroundMotion;
use daisy::geodesy::GeoPoint;
use daisy::orbit::OrbitSample;
use daisy::scatterers::{ScattererPoint, Track};

/// Absolute UTF-8 path of `name` inside a temporary directory.
pub fn temp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 temp path")
}

/// Local scene with an East/North/Up frame at its center.
pub struct Scene {
    pub center: GeoPoint,
}

impl Scene {
    pub fn new(lon_deg: f64, lat_deg: f64, h: f64) -> Self {
        Scene {
            center: GeoPoint::from_degrees(lon_deg, lat_deg, h),
        }
    }

    /// ECEF position of an (east, north, up) offset in meters from the center.
    pub fn ecef(&self, east: f64, north: f64, up: f64) -> Vector3<f64> {
        self.center.xyz + self.center.enu_rotation().transpose() * Vector3::new(east, north, up)
    }

    /// Ground point at an (east, north) offset, degrees out.
    pub fn point(&self, east: f64, north: f64) -> GeoPoint {
        GeoPoint::from_cartesian(self.ecef(east, north, 0.0))
    }

    pub fn scatterer(&self, east: f64, north: f64, v: f64, track: Track) -> ScattererPoint {
        let p = self.point(east, north);
        ScattererPoint::new(p.lon.to_degrees(), p.lat.to_degrees(), p.h, v, track)
    }
}

/// Straight satellite pass over the scene, moving along north at `speed` m/s and
/// crossing the east-west plane of the center at `t_cross`.
pub struct StraightPass {
    pub east: f64,
    pub up: f64,
    pub speed: f64,
    pub t_cross: f64,
}

impl StraightPass {
    pub fn samples(&self, scene: &Scene, times: &[f64]) -> Vec<OrbitSample> {
        times
            .iter()
            .map(|&t| {
                let p = scene.ecef(self.east, self.speed * (t - self.t_cross), self.up);
                OrbitSample::new(t, p.x, p.y, p.z)
            })
            .collect()
    }

    /// Incidence angle (radians) seen from the scene center.
    pub fn incidence(&self) -> f64 {
        (self.east.abs() / self.up).atan()
    }

    /// LOS velocity (positive towards the satellite) of a motion at the scene center.
    pub fn los_velocity(&self, motion: GroundMotion) -> f64 {
        let inc = self.incidence();
        motion.east * self.east.signum() * inc.sin() + motion.up * inc.cos()
    }
}

/// Render samples in the tabular orbit layout, with some header noise around them.
pub fn orbit_file_content(samples: &[OrbitSample]) -> String {
    let mut content = String::from(
        "*******************************************************************\n\
         *_Start_precise_orbits:\n\
         *******************************************************************\n\
         t(s)   X(m)   Y(m)   Z(m)\n",
    );
    writeln!(content, "NUMBER_OF_DATAPOINTS: {}", samples.len()).unwrap();
    for s in samples {
        writeln!(content, " {:.6} {:.6} {:.6} {:.6}", s.t, s.x, s.y, s.z).unwrap();
    }
    content.push_str(
        "\n*******************************************************************\n\
         * End_precise_orbits:_NORMAL\n",
    );
    content
}

/// Evenly spaced sample times.
pub fn sample_times(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

pub fn assert_motion_close(actual: GroundMotion, expected: GroundMotion, epsilon: f64) {
    assert_relative_eq!(actual.east, expected.east, epsilon = epsilon);
    assert_relative_eq!(actual.up, expected.up, epsilon = epsilon);
}
