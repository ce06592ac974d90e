// lio_core/src/loaders/bag.rs

//! Recorded sensor-log container ("bag") with named channels.
//!
//! # File Format
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                 │
//! │ - Magic: "LBAG" (4 bytes)                        │
//! │ - Version: u16 (little-endian)                   │
//! │ - Reserved: u16                                  │
//! ├──────────────────────────────────────────────────┤
//! │ Record Stream                                    │
//! │ [len:u32][postcard BagRecord]...                 │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! A `Channel` record announces a channel name and its numeric id before the
//! first `Message` on that channel, so a reader never needs to seek.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::format::LidarFormatParams;
use super::DatasetIterator;
use crate::error::{LioError, Result};
use crate::types::{ImuMeasurement, LidarMeasurement, LidarParams, Measurement};

/// Magic bytes at start of bag file.
pub const BAG_MAGIC: [u8; 4] = *b"LBAG";

/// Current bag file format version.
pub const BAG_VERSION: u16 = 1;

const HEADER_SIZE: usize = 8;

/// Upper bound on a single record; anything larger means a corrupt length prefix.
const MAX_RECORD_SIZE: usize = 64 * 1024 * 1024;

/// The message type a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Imu,
    PointCloud,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum BagPayload {
    Imu(ImuMeasurement),
    PointCloud(LidarMeasurement),
}

impl BagPayload {
    fn kind(&self) -> ChannelKind {
        match self {
            BagPayload::Imu(_) => ChannelKind::Imu,
            BagPayload::PointCloud(_) => ChannelKind::PointCloud,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum BagRecord {
    Channel {
        id: u16,
        name: String,
        kind: ChannelKind,
    },
    Message {
        channel: u16,
        payload: BagPayload,
    },
}

// =========================================================================
// == Writing ==
// =========================================================================

/// What a finished recording contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagSummary {
    pub path: PathBuf,
    pub message_count: u64,
    pub channel_count: usize,
}

/// Writes measurements into a bag file, one channel per topic name.
pub struct BagWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    channels: HashMap<String, (u16, ChannelKind)>,
    message_count: u64,
}

impl BagWriter {
    /// Creates the file and writes the header immediately.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);

        let mut header = [0u8; HEADER_SIZE];
        header[..4].copy_from_slice(&BAG_MAGIC);
        header[4..6].copy_from_slice(&BAG_VERSION.to_le_bytes());
        writer.write_all(&header)?;

        Ok(Self {
            writer,
            path,
            channels: HashMap::new(),
            message_count: 0,
        })
    }

    pub fn write_imu(&mut self, channel: &str, mm: &ImuMeasurement) -> Result<()> {
        self.write_payload(channel, BagPayload::Imu(mm.clone()))
    }

    pub fn write_lidar(&mut self, channel: &str, mm: &LidarMeasurement) -> Result<()> {
        self.write_payload(channel, BagPayload::PointCloud(mm.clone()))
    }

    /// Routes a measurement to `imu_channel` or `lidar_channel` by its type.
    pub fn write_measurement(
        &mut self,
        imu_channel: &str,
        lidar_channel: &str,
        mm: &Measurement,
    ) -> Result<()> {
        match mm {
            Measurement::Imu(imu) => self.write_imu(imu_channel, imu),
            Measurement::Lidar(lidar) => self.write_lidar(lidar_channel, lidar),
        }
    }

    /// Flushes buffered records and reports what was written.
    pub fn finish(mut self) -> Result<BagSummary> {
        self.writer.flush()?;
        Ok(BagSummary {
            path: self.path,
            message_count: self.message_count,
            channel_count: self.channels.len(),
        })
    }

    fn write_payload(&mut self, channel: &str, payload: BagPayload) -> Result<()> {
        let id = self.channel_id(channel, payload.kind())?;
        self.write_record(&BagRecord::Message {
            channel: id,
            payload,
        })?;
        self.message_count += 1;
        Ok(())
    }

    fn channel_id(&mut self, name: &str, kind: ChannelKind) -> Result<u16> {
        if let Some(&(id, existing)) = self.channels.get(name) {
            if existing != kind {
                return Err(LioError::Bag(format!(
                    "channel '{}' carries {:?}, not {:?}",
                    name, existing, kind
                )));
            }
            return Ok(id);
        }

        let id = u16::try_from(self.channels.len())
            .map_err(|_| LioError::Bag("too many channels".to_string()))?;
        self.write_record(&BagRecord::Channel {
            id,
            name: name.to_string(),
            kind,
        })?;
        self.channels.insert(name.to_string(), (id, kind));
        Ok(id)
    }

    fn write_record(&mut self, record: &BagRecord) -> Result<()> {
        let bytes = postcard::to_allocvec(record)?;
        self.writer.write_all(&(bytes.len() as u32).to_le_bytes())?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }
}

// =========================================================================
// == Reading ==
// =========================================================================

/// Streams the IMU and LiDAR channels of a bag as measurements.
///
/// Messages on other channels are skipped. Scans are converted with the
/// configured `LidarFormatParams` before being yielded.
pub struct BagIter {
    reader: BufReader<File>,
    path: PathBuf,
    imu_channel: String,
    lidar_channel: String,
    lidar_params: LidarParams,
    lidar_format: LidarFormatParams,
    channels: HashMap<u16, (String, ChannelKind)>,
    imu_count: u64,
    lidar_count: u64,
    done: bool,
}

impl BagIter {
    /// Opens a bag and validates its header.
    pub fn open(
        path: impl AsRef<Path>,
        imu_channel: &str,
        lidar_channel: &str,
        lidar_params: LidarParams,
        lidar_format: LidarFormatParams,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);

        let mut header = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut header)
            .map_err(|e| LioError::Bag(format!("failed to read header: {}", e)))?;
        if header[..4] != BAG_MAGIC {
            return Err(LioError::Bag("invalid bag file magic bytes".to_string()));
        }
        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != BAG_VERSION {
            return Err(LioError::Bag(format!(
                "unsupported bag version {} (expected {})",
                version, BAG_VERSION
            )));
        }

        debug!(
            "Opened bag {:?} (imu: '{}', lidar: '{}', format: {:?})",
            path, imu_channel, lidar_channel, lidar_format
        );

        Ok(Self {
            reader,
            path,
            imu_channel: imu_channel.to_string(),
            lidar_channel: lidar_channel.to_string(),
            lidar_params,
            lidar_format,
            channels: HashMap::new(),
            imu_count: 0,
            lidar_count: 0,
            done: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the next record, `None` at a clean end of file.
    fn read_record(&mut self) -> Result<Option<BagRecord>> {
        let mut len_bytes = [0u8; 4];
        let mut filled = 0;
        while filled < len_bytes.len() {
            match self.reader.read(&mut len_bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => return Ok(None),
            4 => {}
            n => {
                return Err(LioError::Bag(format!(
                    "truncated length prefix: {} of 4 bytes",
                    n
                )))
            }
        }

        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > MAX_RECORD_SIZE {
            return Err(LioError::Bag(format!("record too large: {} bytes", len)));
        }

        let mut payload = vec![0u8; len];
        self.reader
            .read_exact(&mut payload)
            .map_err(|e| LioError::Bag(format!("truncated record: {}", e)))?;
        Ok(Some(postcard::from_bytes(&payload)?))
    }

    fn next_measurement(&mut self) -> Result<Option<Measurement>> {
        while let Some(record) = self.read_record()? {
            match record {
                BagRecord::Channel { id, name, kind } => {
                    self.channels.insert(id, (name, kind));
                }
                BagRecord::Message { channel, payload } => {
                    let Some((name, _)) = self.channels.get(&channel) else {
                        return Err(LioError::Bag(format!(
                            "message on undeclared channel {}",
                            channel
                        )));
                    };

                    match payload {
                        BagPayload::Imu(mm) if *name == self.imu_channel => {
                            self.imu_count += 1;
                            return Ok(Some(Measurement::Imu(mm)));
                        }
                        BagPayload::PointCloud(mm) if *name == self.lidar_channel => {
                            self.lidar_count += 1;
                            let mm = self.lidar_format.apply(mm, &self.lidar_params);
                            return Ok(Some(Measurement::Lidar(mm)));
                        }
                        _ => continue,
                    }
                }
            }
        }

        self.report_empty_channels();
        Ok(None)
    }

    fn report_empty_channels(&self) {
        if self.imu_count == 0 {
            warn!("No IMU messages on '{}' in {:?}", self.imu_channel, self.path);
        }
        if self.lidar_count == 0 {
            warn!(
                "No LiDAR messages on '{}' in {:?}",
                self.lidar_channel, self.path
            );
        }
    }
}

impl Iterator for BagIter {
    type Item = Result<Measurement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_measurement() {
            Ok(Some(mm)) => Some(Ok(mm)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // A corrupt stream cannot be resynchronised; stop after reporting.
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl DatasetIterator for BagIter {
    fn num_lidar(&self) -> Option<usize> {
        None
    }
}
