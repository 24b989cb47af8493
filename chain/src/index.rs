//! Historical chain-index snapshots.
//!
//! A snapshot is a delimited text file, optionally gzip- or bzip2-
//! compressed, holding one record per historical block in ascending
//! height order. Snapshots feed the offline verification tooling; the
//! node itself never writes one.
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use peercore_common::bitcoin::hashes::hex::FromHex;
use thiserror::Error;

/// An error while loading a chain-index snapshot.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// Stream-level read error.
    #[error("read error: {0}")]
    Read(#[from] csv::Error),
    /// A malformed row, reported by the strict loader.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line in the decompressed input.
        line: u64,
        /// What failed to parse.
        reason: String,
    },
}

/// One historical block-index record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Height of the block.
    pub height: u32,
    /// Coins minted by this block.
    pub mint: u64,
    /// Money supply after this block.
    pub supply: u64,
    /// Whether a stake modifier was generated at this block.
    pub generated_modifier: bool,
    /// The block's entropy bit, collected by stake-modifier generation.
    pub entropy_bit: bool,
    /// Whether this block is proof-of-stake.
    pub proof_of_stake: bool,
    /// The stake modifier, as opaque bytes.
    pub stake_modifier: Vec<u8>,
    /// Checksum of the stake modifier.
    pub stake_modifier_checksum: Vec<u8>,
    /// Hash satisfying the proof-of-stake target, if any.
    pub hash_proof_of_stake: Vec<u8>,
    /// Transaction hash of the staked output.
    pub prev_out_hash: Vec<u8>,
    /// Output index of the staked output.
    pub prev_out_n: u32,
    /// Timestamp of the staked output.
    pub stake_time: u32,
    /// Merkle root of the block.
    pub merkle_root: Vec<u8>,
    /// Hash of the block.
    pub block_hash: Vec<u8>,
    /// Trust score of the block.
    pub block_trust: Vec<u8>,
    /// Cumulative trust of the chain up to this block.
    pub chain_trust: Vec<u8>,
}

impl IndexRecord {
    /// Parse one snapshot row. The first field is a row label and is
    /// skipped; the remaining fifteen are positional.
    fn parse(row: &csv::StringRecord) -> Result<Self, String> {
        if row.len() < 16 {
            return Err(format!("expected 16 fields, got {}", row.len()));
        }

        let (prev_out_hash, prev_out_n) = match row[10].split_once(':') {
            Some((h, n)) => (hex(h, "prevout hash")?, int(n, "prevout index")?),
            None => return Err(format!("bad prevout: {:?}", &row[10])),
        };

        Ok(Self {
            height: int(&row[1], "height")?,
            mint: int(&row[2], "mint")?,
            supply: int(&row[3], "supply")?,
            generated_modifier: flag(&row[4], "generated-modifier flag")?,
            entropy_bit: flag(&row[5], "entropy bit")?,
            proof_of_stake: flag(&row[6], "proof-of-stake flag")?,
            stake_modifier: hex(&row[7], "stake modifier")?,
            stake_modifier_checksum: hex(&row[8], "stake modifier checksum")?,
            hash_proof_of_stake: hex(&row[9], "proof-of-stake hash")?,
            prev_out_hash,
            prev_out_n,
            stake_time: int(&row[11], "stake time")?,
            merkle_root: hex(&row[12], "merkle root")?,
            block_hash: hex(&row[13], "block hash")?,
            block_trust: hex(&row[14], "block trust")?,
            chain_trust: hex(&row[15], "chain trust")?,
        })
    }
}

fn int<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("bad {}: {:?}", what, s))
}

fn flag(s: &str, what: &str) -> Result<bool, String> {
    int::<u32>(s, what).map(|v| v == 1)
}

fn hex(s: &str, what: &str) -> Result<Vec<u8>, String> {
    Vec::<u8>::from_hex(s).map_err(|_| format!("bad {}: {:?}", what, s))
}

/// An ordered sequence of historical block-index records.
///
/// Records are kept in read order, which is ascending height order in a
/// well-formed snapshot, and are linked by position: [`ChainIndex::next`]
/// and [`ChainIndex::prev`] walk the sequence in either direction. The
/// sequence is immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct ChainIndex {
    records: Vec<IndexRecord>,
}

impl ChainIndex {
    /// Load a snapshot, tolerating a malformed tail.
    ///
    /// One header row is skipped, then parsing stops silently at the
    /// first row that doesn't parse; every record read before it is
    /// kept. Snapshots named with a `.gz` or `.bz2` suffix are
    /// decompressed transparently.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut reader = open(path.as_ref())?;
        let mut records = Vec::new();

        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    log::debug!("chain index truncated: {}", err);
                    break;
                }
            };
            match IndexRecord::parse(&row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    log::debug!("chain index truncated at line {}: {}", line(&row), reason);
                    break;
                }
            }
        }
        Ok(Self { records })
    }

    /// Load a snapshot, rejecting malformed input.
    ///
    /// The first row that doesn't parse aborts the load, with the
    /// offending line number.
    pub fn load_strict<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut reader = open(path.as_ref())?;
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row?;
            let record = IndexRecord::parse(&row).map_err(|reason| Error::Parse {
                line: line(&row),
                reason,
            })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// The earliest record, if any.
    pub fn root(&self) -> Option<&IndexRecord> {
        self.records.first()
    }

    /// The latest record, if any.
    pub fn tip(&self) -> Option<&IndexRecord> {
        self.records.last()
    }

    /// Get the record at the given position.
    pub fn get(&self, pos: usize) -> Option<&IndexRecord> {
        self.records.get(pos)
    }

    /// Get the record following the one at `pos`.
    pub fn next(&self, pos: usize) -> Option<&IndexRecord> {
        self.records.get(pos + 1)
    }

    /// Get the record preceding the one at `pos`.
    pub fn prev(&self, pos: usize) -> Option<&IndexRecord> {
        pos.checked_sub(1).and_then(|pos| self.records.get(pos))
    }

    /// Iterate over the records, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &IndexRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn line(row: &csv::StringRecord) -> u64 {
    row.position().map(|pos| pos.line()).unwrap_or(0)
}

/// Open a snapshot file, layering in the decompressor its suffix calls
/// for. The reader skips the header row on its own.
fn open(path: &Path) -> Result<csv::Reader<Box<dyn Read>>, Error> {
    let file = fs::File::open(path)?;
    let stream: Box<dyn Read> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(flate2::read::GzDecoder::new(file)),
        Some("bz2") => Box::new(bzip2::read::BzDecoder::new(file)),
        _ => Box::new(file),
    };

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(stream))
}
