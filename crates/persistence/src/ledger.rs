// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only score ledger.
//!
//! # File Format
//! ```text
//! [Header: 16 bytes][Frame][Frame][Frame]...
//! ```
//!
//! Header: magic `SLGR`, version u32, reserved u64.
//! Frame: sequence u64, payload_len u32, crc64 u64, then the bincode-encoded `ScoreEvent`.
//! The checksum covers sequence, length and payload.
//!
//! Every append is flushed and fsync'd before returning. A torn tail left by a crash is
//! cut off when the ledger is reopened.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scorekeeper_kernel::error::StoreResult;
use scorekeeper_kernel::storage::ScoreLedger;
use scorekeeper_kernel::{ScoreEvent, StoreError};

use crate::error::{PersistenceError, Result};

const MAGIC: [u8; 4] = *b"SLGR";
const VERSION: u32 = 1;
const HEADER_SIZE: u64 = 16;

/// Upper bound on one encoded event. Guards against allocating for a corrupt length.
const MAX_PAYLOAD: u32 = 64 * 1024;

fn write_file_header<W: Write>(mut w: W) -> io::Result<()> {
    w.write_all(&MAGIC)?;
    w.write_u32::<LittleEndian>(VERSION)?;
    w.write_u64::<LittleEndian>(0)?;
    Ok(())
}

fn read_file_header<R: Read>(mut r: R) -> Result<()> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(PersistenceError::InvalidMagic);
    }
    let version = r.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }
    let _reserved = r.read_u64::<LittleEndian>()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub sequence: u64,
    pub payload_len: u32,
    pub checksum: u64,
}

impl FrameHeader {
    pub const SIZE: usize = 8 + 4 + 8; // 20 bytes

    fn checksum_of(sequence: u64, payload: &[u8]) -> u64 {
        let mut digest = Digest::new();
        digest.write(&sequence.to_le_bytes());
        digest.write(&(payload.len() as u32).to_le_bytes());
        digest.write(payload);
        digest.sum64()
    }

    pub fn for_payload(sequence: u64, payload: &[u8]) -> Self {
        Self {
            sequence,
            payload_len: payload.len() as u32,
            checksum: Self::checksum_of(sequence, payload),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..8].copy_from_slice(&self.sequence.to_le_bytes());
        buf[8..12].copy_from_slice(&self.payload_len.to_le_bytes());
        buf[12..20].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        Ok(Self {
            sequence: reader.read_u64::<LittleEndian>()?,
            payload_len: reader.read_u32::<LittleEndian>()?,
            checksum: reader.read_u64::<LittleEndian>()?,
        })
    }
}

/// Fills `buf` until it is full or the reader is exhausted. Returns bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// One decoded ledger frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub sequence: u64,
    pub event: ScoreEvent,
    /// Size of the frame on disk, header included.
    pub frame_len: u64,
}

/// Sequential, checksum-verifying reader over a ledger file.
pub struct LedgerReader {
    reader: BufReader<File>,
}

impl LedgerReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        read_file_header(&mut reader)?;
        Ok(Self { reader })
    }

    fn read_record(&mut self) -> Option<Result<LedgerRecord>> {
        let mut head = [0u8; FrameHeader::SIZE];
        match read_up_to(&mut self.reader, &mut head) {
            Ok(0) => return None,
            Ok(n) if n < FrameHeader::SIZE => return Some(Err(PersistenceError::Truncated)),
            Ok(_) => {}
            Err(e) => return Some(Err(e.into())),
        }
        let header = match FrameHeader::read_from(&head[..]) {
            Ok(h) => h,
            Err(e) => return Some(Err(e)),
        };
        if header.payload_len > MAX_PAYLOAD {
            return Some(Err(PersistenceError::InvalidFormat(format!(
                "frame {} claims {} bytes",
                header.sequence, header.payload_len
            ))));
        }

        let mut payload = vec![0u8; header.payload_len as usize];
        match read_up_to(&mut self.reader, &mut payload) {
            Ok(n) if n < payload.len() => return Some(Err(PersistenceError::Truncated)),
            Ok(_) => {}
            Err(e) => return Some(Err(e.into())),
        }

        let found = FrameHeader::checksum_of(header.sequence, &payload);
        if found != header.checksum {
            return Some(Err(PersistenceError::ChecksumMismatch {
                expected: header.checksum,
                found,
            }));
        }

        let event = match bincode::serde::decode_from_slice::<ScoreEvent, _>(&payload, bincode::config::standard()) {
            Ok((event, _)) => event,
            Err(e) => return Some(Err(PersistenceError::InvalidFormat(e.to_string()))),
        };

        Some(Ok(LedgerRecord {
            sequence: header.sequence,
            event,
            frame_len: FrameHeader::SIZE as u64 + header.payload_len as u64,
        }))
    }
}

impl Iterator for LedgerReader {
    type Item = Result<LedgerRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record()
    }
}

/// Every event in the ledger, in append order. Fails on the first bad frame.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<ScoreEvent>> {
    LedgerReader::open(path)?
        .map(|r| r.map(|rec| rec.event))
        .collect()
}

fn write_frame(file: &mut File, frame: &[u8]) -> io::Result<()> {
    file.write_all(frame)?;
    file.flush()?;
    file.sync_data()
}

struct LedgerFile {
    file: File,
    len: u64,
    next_sequence: u64,
}

/// File-backed [`ScoreLedger`].
pub struct FileLedger {
    path: PathBuf,
    inner: Mutex<LedgerFile>,
}

impl FileLedger {
    /// Opens or creates the ledger at `path`.
    ///
    /// An existing file is scanned frame by frame; anything after the last valid frame
    /// is truncated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let on_disk = if path.exists() { std::fs::metadata(&path)?.len() } else { 0 };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        // A crash while the header was being written leaves a partial header.
        if on_disk > 0 && on_disk < HEADER_SIZE {
            tracing::warn!(path = %path.display(), bytes = on_disk, "rewriting torn ledger header");
            file.set_len(0)?;
        }

        let (len, next_sequence) = if on_disk >= HEADER_SIZE {
            let (valid_len, count) = Self::recover(&path)?;
            let on_disk = file.metadata()?.len();
            if valid_len < on_disk {
                tracing::warn!(
                    path = %path.display(),
                    dropped_bytes = on_disk - valid_len,
                    "truncating torn ledger tail"
                );
                file.set_len(valid_len)?;
                file.sync_all()?;
            }
            (valid_len, count)
        } else {
            write_file_header(&mut file)?;
            file.sync_all()?;
            (HEADER_SIZE, 0)
        };

        tracing::info!(path = %path.display(), events = next_sequence, "score ledger opened");

        Ok(Self {
            path,
            inner: Mutex::new(LedgerFile {
                file,
                len,
                next_sequence,
            }),
        })
    }

    /// Length of the valid prefix and the number of frames in it.
    fn recover(path: &Path) -> Result<(u64, u64)> {
        let mut valid_len = HEADER_SIZE;
        let mut count = 0u64;
        for record in LedgerReader::open(path)? {
            match record {
                Ok(rec) => {
                    valid_len += rec.frame_len;
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), after = count, error = %e, "bad ledger frame");
                    break;
                }
            }
        }
        Ok((valid_len, count))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events appended so far, including those from earlier runs.
    pub fn event_count(&self) -> u64 {
        self.inner.lock().map(|g| g.next_sequence).unwrap_or(0)
    }

    fn append_event(&self, event: &ScoreEvent) -> Result<u64> {
        let payload = bincode::serde::encode_to_vec(event, bincode::config::standard())
            .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;

        let mut guard = self
            .inner
            .lock()
            .map_err(|_| PersistenceError::InvalidFormat("ledger lock poisoned".to_string()))?;
        let sequence = guard.next_sequence;
        let header = FrameHeader::for_payload(sequence, &payload);

        let mut frame = Vec::with_capacity(FrameHeader::SIZE + payload.len());
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(&payload);

        if let Err(e) = write_frame(&mut guard.file, &frame) {
            // Roll back a partial frame so later appends stay readable.
            let len = guard.len;
            if let Err(trunc) = guard.file.set_len(len) {
                tracing::error!(error = %trunc, "failed to roll back partial ledger frame");
            }
            return Err(e.into());
        }

        guard.len += frame.len() as u64;
        guard.next_sequence += 1;
        Ok(sequence)
    }
}

impl ScoreLedger for FileLedger {
    fn append(&self, event: &ScoreEvent) -> StoreResult<()> {
        self.append_event(event).map(|_| ()).map_err(StoreError::from)
    }
}
