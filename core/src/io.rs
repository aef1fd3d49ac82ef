// ## Region acquisition: memory-mapped files or owned buffers

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::{Mmap, MmapMut};
use thiserror::Error;

use crate::types::OtpError;

/// Canonical input abstraction
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
#[derive(Debug, Clone)]
pub enum OutputSink {
    File(PathBuf),
    /// Keep the output in memory; it is returned in the run snapshot.
    Memory,
}

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("open {path:?} failed: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stat {path:?} failed: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("resize {path:?} to {len} bytes failed: {source}")]
    Resize {
        path: PathBuf,
        len: u64,
        #[source]
        source: io::Error,
    },

    #[error("mmap {path:?} failed: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("flush {path:?} failed: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read-only view of the whole input.
#[derive(Debug)]
pub enum InputRegion {
    Mapped { map: Mmap, path: PathBuf },
    Memory(Vec<u8>),
}

impl InputRegion {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            InputRegion::Mapped { map, .. } => &map[..],
            InputRegion::Memory(buf) => &buf[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writable view of the whole output, same length as the input.
#[derive(Debug)]
pub enum OutputRegion {
    Mapped { map: MmapMut, path: PathBuf },
    Memory(Vec<u8>),
}

impl OutputRegion {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            OutputRegion::Mapped { map, .. } => &map[..],
            OutputRegion::Memory(buf) => &buf[..],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            OutputRegion::Mapped { map, .. } => &mut map[..],
            OutputRegion::Memory(buf) => &mut buf[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Force mapped contents to storage (synchronous msync). No-op for memory.
    pub fn flush(&self) -> Result<(), RegionError> {
        match self {
            OutputRegion::Mapped { map, path } => map.flush().map_err(|source| RegionError::Flush {
                path: path.clone(),
                source,
            }),
            OutputRegion::Memory(_) => Ok(()),
        }
    }

    /// Release the region, returning the buffer for memory outputs.
    pub fn into_memory(self) -> Option<Vec<u8>> {
        match self {
            OutputRegion::Mapped { .. } => None,
            OutputRegion::Memory(buf) => Some(buf),
        }
    }
}

/// Check `len` against `(0, max]` before anything is mapped.
pub fn check_input_len(len: u64, max: u64) -> Result<usize, OtpError> {
    if len == 0 {
        return Err(OtpError::EmptyInput);
    }
    if len > max {
        return Err(OtpError::InputTooLarge { len, max });
    }
    usize::try_from(len).map_err(|_| OtpError::InputTooLarge { len, max: usize::MAX as u64 })
}

/// Acquire the input region. Length limits are enforced before mapping.
pub fn acquire_input(src: InputSource, max: u64) -> Result<InputRegion, OtpError> {
    match src {
        InputSource::Memory(buf) => {
            check_input_len(buf.len() as u64, max)?;
            Ok(InputRegion::Memory(buf))
        }
        InputSource::File(path) => {
            let file = File::open(&path).map_err(|source| RegionError::Open {
                path: path.clone(),
                source,
            })?;
            let len = file
                .metadata()
                .map_err(|source| RegionError::Metadata {
                    path: path.clone(),
                    source,
                })?
                .len();
            check_input_len(len, max)?;

            let map = map_read_only(&file, &path)?;
            debug!("[IO] mapped input {:?} ({} bytes)", path, map.len());
            Ok(InputRegion::Mapped { map, path })
        }
    }
}

/// Acquire an output region of exactly `len` bytes (created/truncated for files).
pub fn acquire_output(sink: OutputSink, len: usize) -> Result<OutputRegion, RegionError> {
    match sink {
        OutputSink::Memory => Ok(OutputRegion::Memory(vec![0u8; len])),
        OutputSink::File(path) => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)
                .map_err(|source| RegionError::Open {
                    path: path.clone(),
                    source,
                })?;
            file.set_len(len as u64).map_err(|source| RegionError::Resize {
                path: path.clone(),
                len: len as u64,
                source,
            })?;

            let map = map_writable(&file, &path)?;
            debug!("[IO] mapped output {:?} ({} bytes)", path, map.len());
            Ok(OutputRegion::Mapped { map, path })
        }
    }
}

#[allow(unsafe_code)]
fn map_read_only(file: &File, path: &Path) -> Result<Mmap, RegionError> {
    // SAFETY: the mapping is read-only for the whole run. Concurrent
    // truncation of the input by another process is outside our control,
    // same as for any mmap-based reader.
    unsafe { Mmap::map(file) }.map_err(|source| RegionError::Map {
        path: path.to_path_buf(),
        source,
    })
}

#[allow(unsafe_code)]
fn map_writable(file: &File, path: &Path) -> Result<MmapMut, RegionError> {
    // SAFETY: the output file was just created/truncated by us and is only
    // accessed through this mapping until it is flushed and dropped.
    unsafe { MmapMut::map_mut(file) }.map_err(|source| RegionError::Map {
        path: path.to_path_buf(),
        source,
    })
}
