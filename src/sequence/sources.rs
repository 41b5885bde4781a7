//! Ready-made sources for [`LazySequence`].
//!
//! Numeric ranges, infinite counters, file lines, CSV records, paginated
//! batches and ID generators. All of them are restartable except
//! [`reader_lines`], which wraps a reader that can only be read once.

use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LazySequence;
use crate::{LazyMemoError, LazyMemoResult};

/// Inclusive range `start..=end` counting up by one.
pub fn range(start: i64, end: i64) -> LazySequence<'static, i64> {
    stepped(start, end, 1)
}

/// Inclusive range with a custom step; a negative step counts down.
///
/// Stops instead of wrapping when the next value would overflow `i64`.
pub fn range_step(start: i64, end: i64, step: i64) -> LazyMemoResult<LazySequence<'static, i64>> {
    if step == 0 {
        return Err(LazyMemoError::validation("step cannot be zero"));
    }
    Ok(stepped(start, end, step))
}

fn stepped(start: i64, end: i64, step: i64) -> LazySequence<'static, i64> {
    LazySequence::create(move || {
        let mut next = Some(start);
        move || -> Result<Option<i64>, Infallible> {
            let Some(current) = next else {
                return Ok(None);
            };
            let in_bounds = if step > 0 { current <= end } else { current >= end };
            if !in_bounds {
                next = None;
                return Ok(None);
            }
            next = current.checked_add(step);
            Ok(Some(current))
        }
    })
}

/// Infinite sequence 1, 2, 3, ...
///
/// Ends only after `u64::MAX`, which no consumer will reach.
pub fn naturals() -> LazySequence<'static, u64> {
    LazySequence::create(|| {
        let mut next = Some(1u64);
        move || -> Result<Option<u64>, Infallible> {
            let current = next;
            next = current.and_then(|n| n.checked_add(1));
            Ok(current)
        }
    })
}

/// Lines of the file at `path`, without trailing `\r`/`\n`.
///
/// Restartable: each cursor opens the file again. Open and read failures
/// surface at the pull that hits them.
pub fn file_lines(path: impl Into<PathBuf>) -> LazySequence<'static, String, io::Error> {
    let path = path.into();
    LazySequence::create(move || {
        let path = path.clone();
        let mut reader: Option<BufReader<File>> = None;
        move || -> io::Result<Option<String>> {
            if reader.is_none() {
                tracing::debug!(path = %path.display(), "opening file");
                reader = Some(BufReader::new(File::open(&path)?));
            }
            match reader.as_mut() {
                Some(reader) => read_trimmed_line(reader),
                None => Ok(None),
            }
        }
    })
}

/// Lines read from `reader`. One-shot: the reader is consumed by the first pass.
pub fn reader_lines<'a, R>(mut reader: R) -> LazySequence<'a, String, io::Error>
where
    R: BufRead + 'a,
{
    LazySequence::once(move || read_trimmed_line(&mut reader))
}

fn read_trimmed_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(|c| c == '\r' || c == '\n').len();
    line.truncate(len);
    Ok(Some(line))
}

/// A record inside a [`Page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// One-based id.
    pub id: u64,

    /// Display title.
    pub title: String,
}

impl Record {
    fn numbered(id: u64) -> Self {
        Self {
            id,
            title: format!("Record {id}"),
        }
    }
}

/// One batch of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// One-based page number.
    pub number: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Records on this page.
    pub records: Vec<Record>,
}

impl Page {
    /// Ids of the records on this page.
    pub fn ids(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Whether more pages follow this one.
    pub fn has_more(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Summary of a streamed API page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPage {
    /// One-based page number.
    pub page: u64,

    /// Number of items in this page.
    pub items: u64,

    /// Whether more pages follow.
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    number: u64,
    total_pages: u64,
    offset: u64,
    len: u64,
}

fn windows(total: u64, page_size: u64) -> LazyMemoResult<LazySequence<'static, Window>> {
    if page_size == 0 {
        return Err(LazyMemoError::validation("page size must be greater than zero"));
    }
    let total_pages = total.div_ceil(page_size);

    Ok(LazySequence::create(move || {
        let mut number = 0;
        move || -> Result<Option<Window>, Infallible> {
            if number >= total_pages {
                return Ok(None);
            }
            number += 1;
            let offset = (number - 1) * page_size;
            Ok(Some(Window {
                number,
                total_pages,
                offset,
                len: page_size.min(total - offset),
            }))
        }
    }))
}

/// Splits `total` records into pages of `page_size`, built one page per pull.
pub fn paginate(total: u64, page_size: u64) -> LazyMemoResult<LazySequence<'static, Page>> {
    Ok(windows(total, page_size)?.map(|w| Page {
        number: w.number,
        total_pages: w.total_pages,
        records: (w.offset + 1..=w.offset + w.len).map(Record::numbered).collect(),
    }))
}

/// Streams page summaries for `total` items served `per_page` at a time.
pub fn api_pages(total: u64, per_page: u64) -> LazyMemoResult<LazySequence<'static, ApiPage>> {
    Ok(windows(total, per_page)?.map(|w| ApiPage {
        page: w.number,
        items: w.len,
        has_more: w.number < w.total_pages,
    }))
}

/// Infinite sequence of `prefix` followed by six random digits.
pub fn prefixed_ids(prefix: impl Into<String>) -> LazySequence<'static, String> {
    let prefix = prefix.into();
    LazySequence::create(move || {
        let prefix = prefix.clone();
        move || -> Result<Option<String>, Infallible> {
            let digits = Uuid::new_v4().as_u128() % 1_000_000;
            Ok(Some(format!("{prefix}{digits:06}")))
        }
    })
}

/// Account status column of a user CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

/// A user row kept by [`csv_records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Upper-cased name.
    pub name: String,
    pub email: String,
    pub age: u32,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    name: String,
    email: String,
    age: u32,
    // Rows without a status column count as active.
    #[serde(default)]
    status: Status,
}

/// Users with the given `status` from a CSV file with a header row.
///
/// Columns are matched by header name, so their order does not matter and
/// extra columns are ignored. Restartable like [`file_lines`]: each cursor
/// opens the file again, and open or parse failures surface at the pull
/// that hits them.
pub fn csv_records(
    path: impl Into<PathBuf>,
    status: Status,
) -> LazySequence<'static, User, csv::Error> {
    let path = path.into();
    LazySequence::create(move || {
        let path = path.clone();
        let mut rows: Option<csv::DeserializeRecordsIntoIter<File, UserRow>> = None;
        move || -> Result<Option<UserRow>, csv::Error> {
            if rows.is_none() {
                tracing::debug!(path = %path.display(), "opening csv file");
                rows = Some(csv::Reader::from_path(&path)?.into_deserialize());
            }
            rows.as_mut().and_then(|rows| rows.next()).transpose()
        }
    })
    .filter(move |row| row.status == status)
    .map(|row| User {
        name: row.name.to_uppercase(),
        email: row.email,
        age: row.age,
    })
}
