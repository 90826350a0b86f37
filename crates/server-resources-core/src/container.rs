//! The `ServerResources.bin` container format.
//!
//! A container packs many named resources into one file:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Signature "ASOL$ApplicationServerResources$2.0" │
//! ├──────────────────────────────────────────────┤
//! │ Payloads (back to back)                      │
//! ├──────────────────────────────────────────────┤  <- headerBegin
//! │ Header records (back to back):               │
//! │   fileBegin       i64 LE                     │
//! │   fileLength      i32 LE                     │
//! │   fileNameLength  i32 LE                     │
//! │   fileName        ASCII                      │
//! ├──────────────────────────────────────────────┤  <- length - 8
//! │ Trailer: headerBegin i32 LE, 4 reserved bytes│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Only the first four trailer bytes are read; the remaining four are
//! written as zero and ignored on read.
//!
//! All offsets and lengths except `fileBegin` are signed 32-bit values, so
//! the header table must start below 2 GiB. A trailer offset with the high
//! bit set reads as negative and the container is rejected.

use std::path::Path;

use bytes::Bytes;

use crate::error::{ResourceError, Result};
use crate::logging::targets;
use crate::reader::{RetryPolicy, read_with_retry};

/// Signature at the start of every container.
pub const SIGNATURE: &[u8] = b"ASOL$ApplicationServerResources$2.0";

/// Conventional file name of a container.
pub const CONTAINER_FILE_NAME: &str = "ServerResources.bin";

/// Size of the trailer at the end of the container.
pub const TRAILER_LEN: usize = 8;

/// Containers larger than this are ignored (150 MiB).
pub const DEFAULT_MAX_CONTAINER_BYTES: u64 = 150 * 1024 * 1024;

/// Fixed part of a header record: fileBegin, fileLength, fileNameLength.
const RECORD_FIXED_LEN: usize = 8 + 4 + 4;

/// One decoded header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Resource name as stored (not normalized).
    pub name: String,
    /// Offset of the payload from the start of the container.
    pub offset: usize,
    /// Payload length in bytes.
    pub length: usize,
}

/// A named payload sliced out of a container buffer without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Resource name as stored (not normalized).
    pub name: String,
    /// The payload bytes.
    pub data: Bytes,
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[at..at + 4]);
    i32::from_le_bytes(raw)
}

fn read_i64(data: &[u8], at: usize) -> i64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[at..at + 8]);
    i64::from_le_bytes(raw)
}

/// Read the header table offset from the trailer.
///
/// The offset is the 4-byte integer at `length - 8`.
pub fn header_begin(data: &[u8]) -> Option<i32> {
    if data.len() < TRAILER_LEN {
        return None;
    }
    Some(read_i32(data, data.len() - TRAILER_LEN))
}

/// Decode the header records of a container.
///
/// Fails with [`ResourceError::Format`] on a bad signature or on any record
/// whose byte range is invalid; no partial record list is returned.
pub fn parse_records(source_name: &str, data: &[u8]) -> Result<Vec<ContainerRecord>> {
    let signature_len = SIGNATURE.len();
    if data.len() < signature_len + TRAILER_LEN {
        return Err(ResourceError::format(source_name, "container is too short"));
    }
    if &data[..signature_len] != SIGNATURE {
        return Err(ResourceError::format(source_name, "signature mismatch"));
    }

    let table_end = data.len() - TRAILER_LEN;
    let header_begin = header_begin(data).unwrap_or(-1);
    if header_begin < 0
        || (header_begin as usize) < signature_len
        || header_begin as usize > table_end
    {
        return Err(ResourceError::format(
            source_name,
            format!("header offset {header_begin} is out of range"),
        ));
    }
    let header_begin = header_begin as usize;

    let mut records = Vec::new();
    let mut cursor = header_begin;
    while cursor < table_end {
        if table_end - cursor < RECORD_FIXED_LEN {
            return Err(ResourceError::format(
                source_name,
                format!("truncated header record at offset {cursor}"),
            ));
        }

        let file_begin = read_i64(data, cursor);
        let file_length = read_i32(data, cursor + 8);
        let name_length = read_i32(data, cursor + 12);
        cursor += RECORD_FIXED_LEN;

        if name_length < 0 || name_length as usize > table_end - cursor {
            return Err(ResourceError::format(
                source_name,
                format!("invalid name length {name_length} at offset {cursor}"),
            ));
        }
        let name_bytes = &data[cursor..cursor + name_length as usize];
        cursor += name_length as usize;

        let in_range = file_length >= 0
            && file_begin >= signature_len as i64
            && file_begin
                .checked_add(i64::from(file_length))
                .is_some_and(|end| end <= header_begin as i64);
        if !in_range {
            return Err(ResourceError::format(
                source_name,
                format!(
                    "record '{}' has invalid range (begin {file_begin}, length {file_length})",
                    String::from_utf8_lossy(name_bytes)
                ),
            ));
        }

        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| ResourceError::format(source_name, "record name is not valid text"))?;

        records.push(ContainerRecord {
            name: name.to_string(),
            offset: file_begin as usize,
            length: file_length as usize,
        });
    }

    Ok(records)
}

/// Decode a container into named payloads.
///
/// Payloads are zero-copy slices of `data`.
pub fn parse_container(source_name: &str, data: &Bytes) -> Result<Vec<ContainerEntry>> {
    let records = parse_records(source_name, data)?;
    tracing::debug!(
        target: targets::CONTAINER,
        source = source_name,
        records = records.len(),
        "parsed container"
    );

    Ok(records
        .into_iter()
        .map(|record| ContainerEntry {
            data: data.slice(record.offset..record.offset + record.length),
            name: record.name,
        })
        .collect())
}

/// Read and decode a container file.
///
/// A file larger than `max_bytes` is treated as empty: no parse attempt is
/// made and no error is returned.
pub fn read_container_file(
    path: &Path,
    max_bytes: u64,
    retry: &RetryPolicy,
) -> Result<Vec<ContainerEntry>> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResourceError::file_missing(path));
        }
        Err(e) => return Err(ResourceError::io(path, e)),
    };

    if metadata.len() > max_bytes {
        tracing::debug!(
            target: targets::CONTAINER,
            path = %path.display(),
            size = metadata.len(),
            max_bytes,
            "container exceeds size limit, ignoring"
        );
        return Ok(Vec::new());
    }

    let data = Bytes::from(read_with_retry(path, retry)?);
    parse_container(&path.display().to_string(), &data)
}

/// Builds container images.
///
/// # Example
///
/// ```
/// use server_resources_core::container::{ContainerWriter, parse_container};
///
/// let mut writer = ContainerWriter::new();
/// writer.add("icons/save-16x16.png", b"png bytes".to_vec());
/// let image = bytes::Bytes::from(writer.to_bytes().unwrap());
///
/// let entries = parse_container("memory", &image).unwrap();
/// assert_eq!(entries[0].name, "icons/save-16x16.png");
/// assert_eq!(&entries[0].data[..], b"png bytes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContainerWriter {
    entries: Vec<(String, Vec<u8>)>,
}

impl ContainerWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named payload.
    pub fn add(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push((name.into(), data.into()));
        self
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the container image.
    ///
    /// Fails if an offset or length does not fit the format's integer widths;
    /// in particular the payloads must end below 2 GiB (`i32::MAX`).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let too_large = || ResourceError::format("writer", "container exceeds format limits");

        let payload_len: usize = self.entries.iter().map(|(_, data)| data.len()).sum();
        let mut out = Vec::with_capacity(SIGNATURE.len() + payload_len + TRAILER_LEN);
        out.extend_from_slice(SIGNATURE);

        let mut offsets = Vec::with_capacity(self.entries.len());
        for (_, data) in &self.entries {
            offsets.push(out.len());
            out.extend_from_slice(data);
        }

        let header_begin = i32::try_from(out.len()).map_err(|_| too_large())?;
        for ((name, data), offset) in self.entries.iter().zip(offsets) {
            let offset = i64::try_from(offset).map_err(|_| too_large())?;
            let length = i32::try_from(data.len()).map_err(|_| too_large())?;
            let name_length = i32::try_from(name.len()).map_err(|_| too_large())?;
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&length.to_le_bytes());
            out.extend_from_slice(&name_length.to_le_bytes());
            out.extend_from_slice(name.as_bytes());
        }

        out.extend_from_slice(&header_begin.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        Ok(out)
    }

    /// Encode the container and write it to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_bytes()?;
        std::fs::write(path, data).map_err(|e| ResourceError::io(path, e))?;
        tracing::debug!(
            target: targets::CONTAINER,
            path = %path.display(),
            entries = self.entries.len(),
            "wrote container"
        );
        Ok(())
    }
}
