// export.rs
//
// Adaptation of an accumulator into its foreign on-disk representation: a
// flat histogram object keyed by a one-letter storage kind, persisted with
// bincode and reopened through a memory map.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::HistError;
use crate::hist::{BinValue, BinnedAccumulator};

const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Storage kind of the foreign histogram representation. Only these three
/// scalar kinds exist on the foreign side.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportKind {
    F32,
    F64,
    I32,
}

impl ExportKind {
    /// One-letter type code used by the foreign format.
    pub fn type_code(&self) -> char {
        match self {
            ExportKind::F32 => 'F',
            ExportKind::F64 => 'D',
            ExportKind::I32 => 'I',
        }
    }
}

/// How [`ExportTarget::persist`] treats an existing file at the target path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistMode {
    #[default]
    Overwrite,
    FailIfExists,
}

/// The consumed interface of the foreign histogram representation:
/// constructible from name/title/shape, slot setters, and a persistence
/// call reporting the bytes it wrote.
pub trait ExportTarget: Sized {
    fn create(name: &str, title: &str, kind: ExportKind, bins: u32, low: f64, high: f64) -> Self;

    fn set_bin_content(&mut self, bin: usize, value: f64);

    fn set_bin_error(&mut self, bin: usize, value: f64);

    fn set_entries(&mut self, entries: u64);

    /// Write the object to storage, returning the number of bytes written.
    /// A `buffer_hint` of zero selects the default write buffer size.
    fn persist(&self, path: &Path, mode: PersistMode, buffer_hint: usize)
        -> Result<u64, HistError>;
}

/// Concrete foreign representation used for persistence and round-trip
/// verification. All `bins + 2` storage slots are carried, sentinels
/// included; `errors` holds the exposed (square-root) error values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportHistogram {
    pub name: String,
    pub title: String,
    pub kind: ExportKind,
    pub bins: u32,
    pub low: f64,
    pub high: f64,
    pub contents: Vec<f64>,
    pub errors: Vec<f64>,
    pub entries: u64,
}

impl ExportHistogram {
    /// Reopen a persisted histogram by memory-mapping the file.
    pub fn open(path: &Path) -> Result<Self, HistError> {
        let file = File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(bincode::deserialize(&mmap[..])?)
    }

    pub fn bin_content(&self, bin: usize) -> f64 {
        self.contents[bin]
    }

    pub fn bin_error(&self, bin: usize) -> f64 {
        self.errors[bin]
    }
}

impl ExportTarget for ExportHistogram {
    fn create(name: &str, title: &str, kind: ExportKind, bins: u32, low: f64, high: f64) -> Self {
        let size = bins as usize + 2;
        ExportHistogram {
            name: name.to_string(),
            title: title.to_string(),
            kind,
            bins,
            low,
            high,
            contents: vec![0.0; size],
            errors: vec![0.0; size],
            entries: 0,
        }
    }

    fn set_bin_content(&mut self, bin: usize, value: f64) {
        self.contents[bin] = value;
    }

    fn set_bin_error(&mut self, bin: usize, value: f64) {
        self.errors[bin] = value;
    }

    fn set_entries(&mut self, entries: u64) {
        self.entries = entries;
    }

    fn persist(
        &self,
        path: &Path,
        mode: PersistMode,
        buffer_hint: usize,
    ) -> Result<u64, HistError> {
        if mode == PersistMode::FailIfExists && path.exists() {
            return Err(HistError::AlreadyExists(path.display().to_string()));
        }
        let capacity = if buffer_hint > 0 {
            buffer_hint
        } else {
            DEFAULT_BUFFER_SIZE
        };
        let mut writer = BufWriter::with_capacity(capacity, File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(bincode::serialized_size(self)?)
    }
}

impl<T: BinValue> BinnedAccumulator<T> {
    /// Build the foreign representation of this accumulator.
    ///
    /// The foreign storage kind is `T::EXPORT_KIND`; scalars without one
    /// are reported at ERROR severity and fail with
    /// [`HistError::UnsupportedExportType`]. Every storage slot including
    /// the sentinels is copied, together with the entry count.
    pub fn export<H: ExportTarget>(&self, name: &str) -> Result<H, HistError> {
        let Some(kind) = T::EXPORT_KIND else {
            let err = HistError::UnsupportedExportType(T::TYPE_NAME);
            error!(accumulator = %self.name(), %err, "export failed");
            return Err(err);
        };

        let mut target = H::create(
            name,
            self.title(),
            kind,
            self.bins(),
            self.low(),
            self.high(),
        );
        for bin in 0..self.axis().storage_size() {
            target.set_bin_content(bin, self.bin_content(bin).to_f64());
            target.set_bin_error(bin, self.bin_error(bin).to_f64());
        }
        target.set_entries(self.entries());
        Ok(target)
    }

    /// Export and persist in one step, returning the bytes written.
    pub fn write_out<H: ExportTarget>(
        &self,
        name: &str,
        path: &Path,
        mode: PersistMode,
        buffer_hint: usize,
    ) -> Result<u64, HistError> {
        let target: H = self.export(name)?;
        target.persist(path, mode, buffer_hint)
    }
}
