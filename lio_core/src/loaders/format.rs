// lio_core/src/loaders/format.rs

//! Hints describing how a recorded point cloud is laid out, and the conversion
//! into the canonical form pipelines receive: stamped at scan start, per-point
//! offsets measured from scan start, dense and row-major.

use serde::{Deserialize, Serialize};

use crate::types::{LidarMeasurement, LidarParams, Point};

/// Order of points in a dense cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LidarMajor {
    /// All columns of scanline 0, then scanline 1, ...
    Row,
    /// All scanlines of column 0, then column 1, ...
    Column,
    /// Decide from whether the first two points share a scanline.
    Guess,
}

/// Reference instant of the per-point time offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LidarPointStamp {
    Start,
    /// Offsets count back from the end of the scan and are non-positive.
    End,
    /// `End` if any offset is negative, `Start` otherwise.
    Guess,
}

/// Whether invalid returns were kept in the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LidarDensity {
    /// One point per (row, column) cell, invalid ones zeroed.
    AllPoints,
    /// Invalid returns dropped; row/column fields locate the rest.
    OnlyValidPoints,
    /// `AllPoints` if the cloud holds exactly `rows * columns` points.
    Guess,
}

/// Which instant of the sweep the message stamp refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LidarStamp {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidarFormatParams {
    pub major: LidarMajor,
    pub point_stamp: LidarPointStamp,
    pub density: LidarDensity,
    pub stamp: LidarStamp,
}

impl Default for LidarFormatParams {
    fn default() -> Self {
        Self {
            major: LidarMajor::Row,
            point_stamp: LidarPointStamp::Guess,
            density: LidarDensity::Guess,
            stamp: LidarStamp::Start,
        }
    }
}

impl LidarFormatParams {
    /// Converts a recorded scan into canonical form.
    pub fn apply(&self, mut mm: LidarMeasurement, params: &LidarParams) -> LidarMeasurement {
        let period = params.scan_period();

        if self.stamp == LidarStamp::End {
            mm.stamp = mm.stamp.shifted(-period);
        }

        if self.resolve_point_stamp(&mm.points) == LidarPointStamp::End {
            for p in mm.points.iter_mut() {
                p.t += period;
            }
        }

        let rows = params.num_rows;
        let cols = params.num_columns;
        if rows == 0 || cols == 0 || mm.points.is_empty() {
            return mm;
        }

        mm.points = match self.resolve_density(&mm.points, params) {
            LidarDensity::OnlyValidPoints => fill_dense(mm.points, rows, cols),
            _ => match self.resolve_major(&mm.points) {
                LidarMajor::Column if mm.points.len() == rows * cols => {
                    column_to_row_major(mm.points, rows, cols)
                }
                _ => mm.points,
            },
        };
        mm
    }

    fn resolve_point_stamp(&self, points: &[Point]) -> LidarPointStamp {
        match self.point_stamp {
            LidarPointStamp::Guess if points.iter().any(|p| p.t < 0.0) => LidarPointStamp::End,
            LidarPointStamp::Guess => LidarPointStamp::Start,
            explicit => explicit,
        }
    }

    fn resolve_density(&self, points: &[Point], params: &LidarParams) -> LidarDensity {
        match self.density {
            LidarDensity::Guess if points.len() == params.num_points() => LidarDensity::AllPoints,
            LidarDensity::Guess => LidarDensity::OnlyValidPoints,
            explicit => explicit,
        }
    }

    fn resolve_major(&self, points: &[Point]) -> LidarMajor {
        match self.major {
            LidarMajor::Guess => match points {
                [first, second, ..] if first.row != second.row => LidarMajor::Column,
                _ => LidarMajor::Row,
            },
            explicit => explicit,
        }
    }
}

/// Scatters valid points into a zeroed row-major grid using their row/column fields.
fn fill_dense(points: Vec<Point>, rows: usize, cols: usize) -> Vec<Point> {
    let mut grid: Vec<Point> = (0..rows * cols)
        .map(|idx| Point {
            row: (idx / cols) as u8,
            col: (idx % cols) as u16,
            ..Default::default()
        })
        .collect();

    let mut dropped = 0usize;
    for p in points {
        let (row, col) = (p.row as usize, p.col as usize);
        if row < rows && col < cols {
            grid[row * cols + col] = p;
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!("Dropped {} points outside the {}x{} scan grid", dropped, rows, cols);
    }
    grid
}

fn column_to_row_major(points: Vec<Point>, rows: usize, cols: usize) -> Vec<Point> {
    let mut reordered = vec![Point::default(); rows * cols];
    for (idx, p) in points.into_iter().enumerate() {
        let col = idx / rows;
        let row = idx % rows;
        reordered[row * cols + col] = p;
    }
    reordered
}
