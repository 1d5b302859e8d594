use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::message::StoredMessage;

/// Record frame: sequence id (u64, big-endian) + payload length (u32,
/// big-endian) + postcard-encoded [`StoredMessage`].
const FRAME_HEADER: u64 = 12;

/// Durable, append-only log of received messages.
///
/// # Responsibilities
/// - Assign each appended message the next sequence number (starting at 1)
/// - Make every append durable before returning its id
/// - Serve any number of ordered, snapshot-at-start scans
///
/// # Invariants
/// - Sequence ids are unique and strictly increasing in insertion order
/// - The file up to the committed offset is a run of well-formed frames
///   with contiguous sequence ids
/// - Records are never rewritten or removed
///
/// Appends are serialized by an internal mutex; scans read through their
/// own file handle and never contend with writers.
pub struct MessageStore {
	path: PathBuf,
	inner: Mutex<LogWriter>,
}

struct LogWriter {
	file: File,
	next_seq: u64,
	/// Byte offset just past the last durable frame.
	committed: u64,
}

impl MessageStore {
	/// Opens the log at `path`, creating it (and its parent directory)
	/// if missing.
	///
	/// Replays the existing framing to recover the next sequence number
	/// and the committed offset.
	///
	/// # Errors
	/// Returns [`StoreError::Unavailable`] when the file cannot be opened
	/// or its framing is damaged (short frame, non-contiguous sequence).
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
		let path = path.as_ref().to_path_buf();
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent).map_err(|e| {
					StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
				})?;
			}
		}

		let file = OpenOptions::new()
			.read(true)
			.append(true)
			.create(true)
			.open(&path)
			.map_err(|e| StoreError::Unavailable(format!("cannot open {}: {e}", path.display())))?;

		let (next_seq, committed) = Self::replay(&file)?;
		info!(path = %path.display(), records = next_seq - 1, "message log opened");

		Ok(Self {
			path,
			inner: Mutex::new(LogWriter { file, next_seq, committed }),
		})
	}

	/// Walks the frame headers of an existing log without decoding the
	/// payloads, validating that sequence ids are contiguous from 1.
	fn replay(file: &File) -> Result<(u64, u64), StoreError> {
		let unavailable = |reason: String| StoreError::Unavailable(reason);

		let len = file
			.metadata()
			.map_err(|e| unavailable(format!("cannot stat log: {e}")))?
			.len();

		let clone = file
			.try_clone()
			.map_err(|e| unavailable(format!("cannot clone log handle: {e}")))?;
		let mut reader = BufReader::new(clone);
		reader
			.seek(SeekFrom::Start(0))
			.map_err(|e| unavailable(format!("cannot rewind log: {e}")))?;

		let mut offset = 0u64;
		let mut last_seq = 0u64;
		let mut header = [0u8; FRAME_HEADER as usize];
		while offset < len {
			if len - offset < FRAME_HEADER {
				return Err(unavailable(format!("truncated frame header at offset {offset}")));
			}
			reader
				.read_exact(&mut header)
				.map_err(|e| unavailable(format!("unreadable frame at offset {offset}: {e}")))?;

			let mut seq_bytes = [0u8; 8];
			seq_bytes.copy_from_slice(&header[..8]);
			let seq = u64::from_be_bytes(seq_bytes);
			let mut len_bytes = [0u8; 4];
			len_bytes.copy_from_slice(&header[8..]);
			let payload_len = u32::from_be_bytes(len_bytes) as u64;

			if seq != last_seq + 1 {
				return Err(unavailable(format!(
					"non-contiguous sequence {seq} after {last_seq} at offset {offset}"
				)));
			}
			if len - offset - FRAME_HEADER < payload_len {
				return Err(unavailable(format!("truncated record {seq} at offset {offset}")));
			}

			reader
				.seek_relative(payload_len as i64)
				.map_err(|e| unavailable(format!("cannot skip record {seq}: {e}")))?;
			offset += FRAME_HEADER + payload_len;
			last_seq = seq;
		}

		Ok((last_seq + 1, offset))
	}

	/// Appends a message and returns its assigned sequence id.
	///
	/// The record is on disk (written and fsynced) before this returns.
	/// Safe under concurrent callers: ids never repeat and a committed
	/// append is visible to every scan that starts afterward.
	///
	/// # Errors
	/// Returns [`StoreError::WriteFailed`] when the write or sync fails;
	/// the file is rolled back to the last committed frame boundary and
	/// the store stays usable.
	pub fn append(&self, message: &StoredMessage) -> Result<u64, StoreError> {
		let payload = postcard::to_stdvec(message).map_err(|e| {
			StoreError::WriteFailed(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
		})?;

		let mut inner = self.lock();
		let seq = inner.next_seq;

		let mut frame = Vec::with_capacity(FRAME_HEADER as usize + payload.len());
		frame.extend_from_slice(&seq.to_be_bytes());
		frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
		frame.extend_from_slice(&payload);

		if let Err(e) = Self::write_frame(&mut inner.file, &frame) {
			let committed = inner.committed;
			if let Err(trunc) = inner.file.set_len(committed) {
				warn!("cannot roll back partial frame: {trunc}");
			}
			return Err(StoreError::WriteFailed(e));
		}

		inner.committed += frame.len() as u64;
		inner.next_seq += 1;
		debug!(seq, bytes = frame.len(), "message appended");
		Ok(seq)
	}

	fn write_frame(file: &mut File, frame: &[u8]) -> std::io::Result<()> {
		file.write_all(frame)?;
		file.sync_all()
	}

	/// Starts an independent traversal of the log from the beginning,
	/// in ascending sequence order.
	///
	/// The scan covers exactly the records committed before this call;
	/// appends that land afterward are not observed.
	///
	/// # Errors
	/// Returns [`StoreError::Unavailable`] when the log cannot be
	/// reopened for reading.
	pub fn scan(&self) -> Result<Scan, StoreError> {
		let committed = self.lock().committed;
		let file = File::open(&self.path).map_err(|e| {
			StoreError::Unavailable(format!("cannot reopen {}: {e}", self.path.display()))
		})?;
		Ok(Scan {
			reader: BufReader::new(file),
			remaining: committed,
			next_seq: 1,
		})
	}

	/// Number of committed records.
	pub fn len(&self) -> u64 {
		self.lock().next_seq - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn lock(&self) -> MutexGuard<'_, LogWriter> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Snapshot-at-start scan over a [`MessageStore`].
///
/// Yields `(sequence id, message)` pairs in ascending order. A record
/// whose payload no longer decodes yields
/// [`StoreError::MalformedRecord`] and ends the scan.
pub struct Scan {
	reader: BufReader<File>,
	/// Bytes left inside the snapshot captured at scan start.
	remaining: u64,
	next_seq: u64,
}

impl Scan {
	fn read_record(&mut self) -> Result<(u64, StoredMessage), StoreError> {
		let expected = self.next_seq;
		let malformed =
			|seq: u64, reason: String| StoreError::MalformedRecord { seq, reason };

		let mut header = [0u8; FRAME_HEADER as usize];
		self.reader
			.read_exact(&mut header)
			.map_err(|e| malformed(expected, format!("unreadable frame: {e}")))?;

		let mut seq_bytes = [0u8; 8];
		seq_bytes.copy_from_slice(&header[..8]);
		let seq = u64::from_be_bytes(seq_bytes);
		let mut len_bytes = [0u8; 4];
		len_bytes.copy_from_slice(&header[8..]);
		let payload_len = u32::from_be_bytes(len_bytes) as usize;

		let mut payload = vec![0u8; payload_len];
		self.reader
			.read_exact(&mut payload)
			.map_err(|e| malformed(seq, format!("unreadable payload: {e}")))?;

		let message =
			postcard::from_bytes(&payload).map_err(|e| malformed(seq, e.to_string()))?;

		self.remaining = self
			.remaining
			.saturating_sub(FRAME_HEADER + payload_len as u64);
		self.next_seq = seq + 1;
		Ok((seq, message))
	}
}

impl Iterator for Scan {
	type Item = Result<(u64, StoredMessage), StoreError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let record = self.read_record();
		if record.is_err() {
			// A damaged record ends the traversal, it is not skipped.
			self.remaining = 0;
		}
		Some(record)
	}
}
