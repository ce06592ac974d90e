// lio_core/src/trajectory.rs

//! Timestamped pose sequences and the column-oriented text formats used to
//! store ground truth and estimates.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use std::fs::File;
use std::path::Path;

use crate::error::{LioError, Result};
use crate::types::{Stamp, SE3};

/// Column layout of a TUM trajectory file.
pub const TUM_FIELDS: [&str; 8] = ["sec", "x", "y", "z", "qx", "qy", "qz", "qw"];

/// An ordered sequence of timestamped poses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub stamps: Vec<Stamp>,
    pub poses: Vec<SE3>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stamp: Stamp, pose: SE3) {
        self.stamps.push(stamp);
        self.poses.push(pose);
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stamp, &SE3)> {
        self.stamps.iter().zip(self.poses.iter())
    }

    /// Replaces every pose `P` with `P * t`, i.e. re-expresses the trajectory
    /// for a body frame offset by `t`.
    pub fn right_multiply(&mut self, t: &SE3) {
        for pose in self.poses.iter_mut() {
            *pose *= t;
        }
    }

    /// Reads a whitespace-separated TUM file: `sec x y z qx qy qz qw`.
    pub fn from_tum(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv(path, &TUM_FIELDS, b' ')
    }

    /// Reads a delimited text file whose columns are named by `fields`.
    ///
    /// Recognised names are `sec`, `nsec`, `x`, `y`, `z`, `qx`, `qy`, `qz`, `qw`;
    /// any other name marks a column to skip. Lines starting with `#` are
    /// comments. With a space or tab delimiter, any run of spaces and tabs
    /// counts as one separator and indented comments are skipped too.
    pub fn from_csv(path: impl AsRef<Path>, fields: &[&str], delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let layout = ColumnLayout::from_fields(fields)?;
        let collapse_whitespace = delimiter == b' ' || delimiter == b'\t';

        let file = File::open(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut trajectory = Trajectory::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            let values = split_record(&record, collapse_whitespace);
            if values.is_empty() {
                continue;
            }
            if values.len() < fields.len() {
                return Err(LioError::TrajectoryParse {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("expected {} columns, found {}", fields.len(), values.len()),
                });
            }

            let (stamp, pose) = layout.parse(&values).map_err(|reason| LioError::TrajectoryParse {
                path: path.to_path_buf(),
                line,
                reason,
            })?;
            trajectory.push(stamp, pose);
        }

        Ok(trajectory)
    }

    /// Writes the trajectory in TUM layout, nanosecond-exact stamps.
    pub fn to_tum(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b' ')
            .from_path(path.as_ref())?;

        wtr.write_record(["#", "sec", "x", "y", "z", "qx", "qy", "qz", "qw"])?;
        for (stamp, pose) in self.iter() {
            let t = pose.translation.vector;
            let q = pose.rotation.quaternion();
            wtr.write_record([
                stamp.to_string(),
                t.x.to_string(),
                t.y.to_string(),
                t.z.to_string(),
                q.i.to_string(),
                q.j.to_string(),
                q.k.to_string(),
                q.w.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn split_record(record: &StringRecord, collapse_whitespace: bool) -> Vec<&str> {
    if !collapse_whitespace {
        return record.iter().collect();
    }
    // Tabs and spaces are interchangeable; an indented `#` still starts a comment.
    let values: Vec<&str> = record
        .iter()
        .flat_map(|field| field.split(char::is_whitespace))
        .filter(|value| !value.is_empty())
        .collect();
    match values.first() {
        Some(first) if first.starts_with('#') => Vec::new(),
        _ => values,
    }
}

/// Column indices resolved once from the field names.
struct ColumnLayout {
    sec: usize,
    nsec: Option<usize>,
    translation: [usize; 3],
    rotation: [usize; 4], // qx, qy, qz, qw
}

impl ColumnLayout {
    fn from_fields(fields: &[&str]) -> Result<Self> {
        let find = |name: &'static str| -> Result<usize> {
            fields
                .iter()
                .position(|f| *f == name)
                .ok_or(LioError::MissingField(name))
        };

        Ok(Self {
            sec: find("sec")?,
            nsec: fields.iter().position(|f| *f == "nsec"),
            translation: [find("x")?, find("y")?, find("z")?],
            rotation: [find("qx")?, find("qy")?, find("qz")?, find("qw")?],
        })
    }

    fn parse(&self, values: &[&str]) -> std::result::Result<(Stamp, SE3), String> {
        let number = |idx: usize| -> std::result::Result<f64, String> {
            values[idx]
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", values[idx]))
        };

        let mut stamp = parse_stamp(values[self.sec])
            .ok_or_else(|| format!("'{}' is not a valid timestamp", values[self.sec]))?;
        if let Some(idx) = self.nsec {
            let nsec = values[idx]
                .parse::<u64>()
                .map_err(|_| format!("'{}' is not a nanosecond count", values[idx]))?;
            stamp = Stamp::from_nsec(stamp.sec as u64 * 1_000_000_000 + nsec);
        }

        let [ix, iy, iz] = self.translation;
        let translation = Translation3::new(number(ix)?, number(iy)?, number(iz)?);

        let [iqx, iqy, iqz, iqw] = self.rotation;
        let q = Quaternion::new(number(iqw)?, number(iqx)?, number(iqy)?, number(iqz)?);
        if q.norm() == 0.0 {
            return Err("quaternion has zero norm".to_string());
        }

        Ok((stamp, SE3::from_parts(translation, UnitQuaternion::from_quaternion(q))))
    }
}

/// Parses decimal seconds without routing through `f64`, so epoch stamps keep
/// nanosecond precision. Falls back to `f64` for exponent notation.
fn parse_stamp(text: &str) -> Option<Stamp> {
    if text.contains(['e', 'E']) {
        let sec = text.parse::<f64>().ok()?;
        return (sec >= 0.0).then(|| Stamp::from_sec(sec));
    }

    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    let sec = if whole.is_empty() { 0 } else { whole.parse::<u32>().ok()? };
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
    let nsec = digits.parse::<u32>().ok()?;
    Some(Stamp::new(sec, nsec))
}
