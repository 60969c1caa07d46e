//! Legacy binary workbook (`.xls`) writer
//!
//! Produces a BIFF8 `Workbook` stream inside an OLE2 compound file. The
//! workbook holds the minimal global records Excel expects (fonts, cell
//! formats, one sheet entry), a shared string table for every distinct
//! cell text, and a single worksheet of `LABELSST` / `BLANK` cells.

use super::TableWriter;
use crate::error::{OrderError, Result};
use crate::models::{ExportFormat, OrderTable};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use tracing::debug;

/// BIFF8 record identifiers
mod record {
    pub const BOF: u16 = 0x0809;
    pub const EOF: u16 = 0x000A;
    pub const CODEPAGE: u16 = 0x0042;
    pub const WINDOW1: u16 = 0x003D;
    pub const FONT: u16 = 0x0031;
    pub const XF: u16 = 0x00E0;
    pub const STYLE: u16 = 0x0293;
    pub const BOUNDSHEET: u16 = 0x0085;
    pub const SST: u16 = 0x00FC;
    pub const CONTINUE: u16 = 0x003C;
    pub const EXTSST: u16 = 0x00FF;
    pub const DIMENSIONS: u16 = 0x0200;
    pub const WINDOW2: u16 = 0x023E;
    pub const BLANK: u16 = 0x0201;
    pub const LABELSST: u16 = 0x00FD;
}

/// Largest payload a single BIFF8 record may carry
const MAX_RECORD_DATA: usize = 8224;

/// Rows addressable by a BIFF8 worksheet
const MAX_ROWS: usize = 65_536;

/// Longest text Excel accepts in one cell (UTF-16 units)
const MAX_CELL_CHARS: usize = 32_767;

/// Workbook streams shorter than this would land in the compound file's mini stream
const MIN_WORKBOOK_STREAM: usize = 4096;

const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
const BOF_WORKSHEET: u16 = 0x0010;

/// UTF-16LE code page
const CODEPAGE_UTF16: u16 = 0x04B0;

/// Built-in style XFs 0-14 precede the default cell XF
const STYLE_XF_COUNT: u16 = 15;
const CELL_XF_INDEX: u16 = STYLE_XF_COUNT;

/// `.xls` encoder
#[derive(Debug, Clone)]
pub struct XlsWriter {
    sheet_name: String,
}

impl XlsWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Build the raw BIFF8 workbook stream (without the compound file wrapper)
    pub fn workbook_stream(&self, table: &OrderTable) -> Result<Vec<u8>> {
        let row_count = table.len() + 1;
        if row_count > MAX_ROWS {
            return Err(OrderError::TooManyRows {
                format: ExportFormat::Xls.to_string(),
                rows: row_count,
                limit: MAX_ROWS,
            });
        }

        let sst = SharedStrings::collect(table);
        let mut stream = BiffStream::default();

        // Workbook globals
        stream.record(record::BOF, &bof(BOF_WORKBOOK_GLOBALS));
        stream.record(record::CODEPAGE, &CODEPAGE_UTF16.to_le_bytes());
        stream.record(record::WINDOW1, &window1());
        for _ in 0..4 {
            stream.record(record::FONT, &font("Arial"));
        }
        for _ in 0..STYLE_XF_COUNT {
            stream.record(record::XF, &xf(true));
        }
        stream.record(record::XF, &xf(false));
        stream.record(record::STYLE, &normal_style());
        let sheet_offset_at = stream.len() + 4;
        stream.record(record::BOUNDSHEET, &boundsheet(&self.sheet_name));
        sst.write(&mut stream);
        stream.record(record::EOF, &[]);

        // Worksheet
        let sheet_offset = stream.len() as u32;
        stream.patch_u32(sheet_offset_at, sheet_offset);

        stream.record(record::BOF, &bof(BOF_WORKSHEET));
        stream.record(
            record::DIMENSIONS,
            &dimensions(row_count as u32, table.width() as u16),
        );
        stream.record(record::WINDOW2, &window2());

        for (row_idx, row) in table.all_rows().enumerate() {
            for (col_idx, text) in row.iter().enumerate() {
                let mut cell = Vec::with_capacity(10);
                cell.put_u16(row_idx as u16);
                cell.put_u16(col_idx as u16);
                cell.put_u16(CELL_XF_INDEX);

                match sst.index_of(text) {
                    Some(isst) => {
                        cell.put_u32(isst);
                        stream.record(record::LABELSST, &cell);
                    }
                    None => stream.record(record::BLANK, &cell),
                }
            }
        }
        stream.record(record::EOF, &[]);

        let mut bytes = stream.into_bytes();
        if bytes.len() < MIN_WORKBOOK_STREAM {
            bytes.resize(MIN_WORKBOOK_STREAM, 0);
        }

        debug!(
            "Encoded BIFF8 workbook: {} cells, {} unique strings, {} bytes",
            row_count * table.width(),
            sst.unique_count(),
            bytes.len()
        );

        Ok(bytes)
    }
}

impl TableWriter for XlsWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xls
    }

    fn encode(&self, table: &OrderTable) -> Result<Vec<u8>> {
        let workbook = self.workbook_stream(table)?;

        let mut compound =
            cfb::CompoundFile::create_with_version(cfb::Version::V3, Cursor::new(Vec::new()))?;
        {
            let mut stream = compound.create_stream("/Workbook")?;
            stream.write_all(&workbook)?;
            stream.flush()?;
        }
        compound.flush()?;

        Ok(compound.into_inner().into_inner())
    }
}

/// Byte buffer of consecutive BIFF records
#[derive(Default)]
struct BiffStream {
    bytes: Vec<u8>,
}

impl BiffStream {
    fn record(&mut self, id: u16, data: &[u8]) {
        debug_assert!(data.len() <= MAX_RECORD_DATA);
        self.bytes.put_u16(id);
        self.bytes.put_u16(data.len() as u16);
        self.bytes.extend_from_slice(data);
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn patch_u32(&mut self, at: usize, value: u32) {
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

trait PutLe {
    fn put_u8(&mut self, value: u8);
    fn put_u16(&mut self, value: u16);
    fn put_u32(&mut self, value: u32);
}

impl PutLe for Vec<u8> {
    fn put_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }
}

/// Cell text as BIFF8 stores it: Latin-1 bytes when every unit fits, UTF-16LE otherwise
struct EncodedText {
    char_count: u16,
    high_byte: bool,
    bytes: Vec<u8>,
}

impl EncodedText {
    fn new(text: &str) -> Self {
        let mut units: Vec<u16> = text.encode_utf16().collect();
        if units.len() > MAX_CELL_CHARS {
            let mut cut = MAX_CELL_CHARS;
            // Never keep half of a surrogate pair
            if (0xD800..=0xDBFF).contains(&units[cut - 1]) {
                cut -= 1;
            }
            debug!(
                "Truncating cell text from {} to {} UTF-16 units",
                units.len(),
                cut
            );
            units.truncate(cut);
        }

        let high_byte = units.iter().any(|&unit| unit > 0xFF);
        let bytes = if high_byte {
            units.iter().flat_map(|unit| unit.to_le_bytes()).collect()
        } else {
            units.iter().map(|&unit| unit as u8).collect()
        };

        Self {
            char_count: units.len() as u16,
            high_byte,
            bytes,
        }
    }

    fn flags(&self) -> u8 {
        u8::from(self.high_byte)
    }

    fn char_size(&self) -> usize {
        if self.high_byte { 2 } else { 1 }
    }
}

/// Shared string table: every distinct non-empty cell text, in first-seen order
struct SharedStrings<'a> {
    strings: Vec<&'a str>,
    index: HashMap<&'a str, u32>,
    references: u32,
}

impl<'a> SharedStrings<'a> {
    fn collect(table: &'a OrderTable) -> Self {
        let mut sst = Self {
            strings: Vec::new(),
            index: HashMap::new(),
            references: 0,
        };

        let header = table.header.iter().copied();
        let cells = table.rows.iter().flatten().map(String::as_str);
        for text in header.chain(cells).filter(|text| !text.is_empty()) {
            sst.references += 1;
            if !sst.index.contains_key(text) {
                sst.index.insert(text, sst.strings.len() as u32);
                sst.strings.push(text);
            }
        }

        sst
    }

    fn index_of(&self, text: &str) -> Option<u32> {
        self.index.get(text).copied()
    }

    fn unique_count(&self) -> usize {
        self.strings.len()
    }

    /// Strings per EXTSST bucket; keeps the bucket count at 128 or fewer
    fn bucket_size(&self) -> usize {
        self.strings.len().div_ceil(128).max(8)
    }

    /// Emit SST, its CONTINUE records, and EXTSST
    fn write(&self, stream: &mut BiffStream) {
        let bucket_size = self.bucket_size();
        let mut payloads: Vec<Vec<u8>> = Vec::new();
        let mut current = Vec::with_capacity(MAX_RECORD_DATA);
        // (payload index, offset in payload) of every bucket's first string
        let mut buckets: Vec<(usize, usize)> = Vec::new();

        current.put_u32(self.references);
        current.put_u32(self.strings.len() as u32);

        for (i, text) in self.strings.iter().enumerate() {
            let encoded = EncodedText::new(text);

            // The 3-byte header and the first character never straddle records
            if current.len() + 3 + encoded.char_size() > MAX_RECORD_DATA {
                payloads.push(std::mem::take(&mut current));
            }
            if i % bucket_size == 0 {
                buckets.push((payloads.len(), current.len()));
            }

            current.put_u16(encoded.char_count);
            current.put_u8(encoded.flags());

            let mut remaining = encoded.bytes.as_slice();
            loop {
                let room = (MAX_RECORD_DATA - current.len()) / encoded.char_size()
                    * encoded.char_size();
                let take = room.min(remaining.len());
                current.extend_from_slice(&remaining[..take]);
                remaining = &remaining[take..];

                if remaining.is_empty() {
                    break;
                }
                payloads.push(std::mem::take(&mut current));
                current.put_u8(encoded.flags());
            }
        }
        payloads.push(current);

        let sst_start = stream.len();
        let mut record_starts = Vec::with_capacity(payloads.len());
        for (i, payload) in payloads.iter().enumerate() {
            record_starts.push(stream.len());
            let id = if i == 0 { record::SST } else { record::CONTINUE };
            stream.record(id, payload);
        }

        let mut extsst = Vec::with_capacity(2 + buckets.len() * 8);
        extsst.put_u16(bucket_size as u16);
        for (payload_idx, offset) in buckets {
            extsst.put_u32((record_starts[payload_idx] + 4 + offset) as u32);
            extsst.put_u16((4 + offset) as u16);
            extsst.put_u16(0);
        }
        stream.record(record::EXTSST, &extsst);

        debug!(
            "SST at offset {}: {} strings in {} records",
            sst_start,
            self.strings.len(),
            payloads.len()
        );
    }
}

fn bof(substream: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(16);
    data.put_u16(0x0600); // BIFF8
    data.put_u16(substream);
    data.put_u16(0x0DBB); // build
    data.put_u16(0x07CC); // year
    data.put_u32(0);
    data.put_u32(0x06); // lowest BIFF version
    data
}

fn window1() -> Vec<u8> {
    let mut data = Vec::with_capacity(18);
    data.put_u16(0); // x
    data.put_u16(0); // y
    data.put_u16(0x4000); // width
    data.put_u16(0x2000); // height
    data.put_u16(0x0038); // scroll bars and tabs visible
    data.put_u16(0); // active sheet
    data.put_u16(0); // first visible tab
    data.put_u16(1); // selected tabs
    data.put_u16(0x0258); // tab bar ratio
    data
}

fn font(name: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(16 + name.len());
    data.put_u16(200); // 10pt in twips
    data.put_u16(0);
    data.put_u16(0x7FFF); // automatic colour
    data.put_u16(400); // normal weight
    data.put_u16(0);
    data.put_u8(0);
    data.put_u8(0);
    data.put_u8(0);
    data.put_u8(0);
    data.put_u8(name.len() as u8);
    data.put_u8(0);
    data.extend_from_slice(name.as_bytes());
    data
}

fn xf(style: bool) -> Vec<u8> {
    let mut data = Vec::with_capacity(20);
    data.put_u16(0); // font
    data.put_u16(0); // number format "General"
    data.put_u16(if style { 0xFFF5 } else { 0x0001 }); // locked; style XFs have no parent
    data.put_u8(0x20); // bottom aligned
    data.put_u8(0);
    data.put_u8(0);
    data.put_u8(if style { 0xF4 } else { 0x00 });
    data.put_u32(0); // borders
    data.put_u32(0);
    data.put_u16(0x20C0); // default pattern colours
    data
}

fn normal_style() -> Vec<u8> {
    let mut data = Vec::with_capacity(4);
    data.put_u16(0x8000); // built-in, XF 0
    data.put_u8(0); // "Normal"
    data.put_u8(0xFF);
    data
}

/// BOUNDSHEET with a zero stream offset, patched once the sheet position is known
fn boundsheet(name: &str) -> Vec<u8> {
    let encoded = EncodedText::new(name);
    let mut data = Vec::with_capacity(8 + encoded.bytes.len());
    data.put_u32(0);
    data.put_u8(0); // visible
    data.put_u8(0); // worksheet
    data.put_u8(encoded.char_count as u8);
    data.put_u8(encoded.flags());
    data.extend_from_slice(&encoded.bytes);
    data
}

fn dimensions(rows: u32, cols: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(14);
    data.put_u32(0);
    data.put_u32(rows);
    data.put_u16(0);
    data.put_u16(cols);
    data.put_u16(0);
    data
}

fn window2() -> Vec<u8> {
    let mut data = Vec::with_capacity(18);
    data.put_u16(0x06B6); // gridlines, headers, zeros, outline, selected, active
    data.put_u16(0); // top row
    data.put_u16(0); // left column
    data.put_u16(0x40); // gridline colour
    data.put_u16(0);
    data.put_u16(0);
    data.put_u16(0);
    data.put_u16(0);
    data.put_u16(0);
    data
}
