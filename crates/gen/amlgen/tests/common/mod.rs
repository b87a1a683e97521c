//! Test-only AML decoder.
//!
//! An independent reader for the subset of AML the serializer's tests
//! produce. It shares no code with the crate under test, so a bug in the
//! encoder's size arithmetic shows up as a decode failure here rather than
//! being mirrored.

#![allow(dead_code)]

use std::fmt;

/// Length of an SDT header.
pub const HEADER_LEN: usize = 36;

/// Decoder failure with the byte offset where it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub offset: usize,
    pub what: &'static str,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {:#x}", self.what, self.offset)
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// A decoded data object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(u64),
    String(String),
    Buffer(Vec<u8>),
    Package(Vec<Value>),
}

/// A decoded term of a definition block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Scope { name: String, body: Vec<Term> },
    Device { name: String, body: Vec<Term> },
    Name { name: String, value: Value },
    Method { name: String, flags: u8, body: Vec<u8> },
}

/// A decoded resource descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Io { info: u8, min: u16, max: u16, alignment: u8, length: u8 },
    FixedIo { base: u16, length: u8 },
    Irq { mask: u16, flags: u8 },
    Dma { mask: u8, flags: u8 },
    Memory32 { info: u8, min: u32, max: u32, alignment: u32, length: u32 },
    FixedMemory32 { info: u8, base: u32, length: u32 },
    ExtendedIrq { flags: u8, gsi: u32 },
}

/// Header fields the tests look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub signature: [u8; 4],
    pub length: u32,
    pub revision: u8,
    pub checksum: u8,
    pub oem_id: [u8; 6],
    pub oem_table_id: [u8; 8],
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn err(&self, what: &'static str) -> DecodeError {
        DecodeError { offset: self.pos, what }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn peek(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or_else(|| self.err("unexpected end of data"))
    }

    fn u8(&mut self) -> Result<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len());
        let end = end.ok_or_else(|| self.err("read past end of data"))?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn le(&mut self, n: usize) -> Result<u64> {
        let raw = self.bytes(n)?;
        Ok(raw.iter().rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Reads a `PkgLength` and returns the offset where the package ends.
    ///
    /// The encoded length counts the length field itself.
    fn pkg_end(&mut self) -> Result<usize> {
        let start = self.pos;
        let lead = self.u8()?;
        let follow = usize::from(lead >> 6);
        let length = if follow == 0 {
            usize::from(lead & 0x3F)
        } else {
            if lead & 0x30 != 0 {
                return Err(self.err("reserved PkgLength bits set"));
            }
            let mut length = usize::from(lead & 0x0F);
            for i in 0..follow {
                length |= usize::from(self.u8()?) << (4 + 8 * i);
            }
            length
        };
        if length <= follow {
            return Err(self.err("PkgLength smaller than its own encoding"));
        }
        let end = start + length;
        if end > self.data.len() {
            return Err(self.err("package extends past its container"));
        }
        Ok(end)
    }

    /// Creates a reader restricted to `[pos, end)`, advancing past it.
    fn sub(&mut self, end: usize) -> Reader<'a> {
        let sub = Reader { data: &self.data[..end], pos: self.pos };
        self.pos = end;
        sub
    }

    fn name_seg(&mut self) -> Result<String> {
        let seg = self.bytes(4)?;
        let valid = seg.iter().enumerate().all(|(i, &c)| {
            c.is_ascii_uppercase() || c == b'_' || (i > 0 && c.is_ascii_digit())
        });
        if !valid {
            return Err(self.err("invalid name segment"));
        }
        Ok(String::from_utf8_lossy(seg).into_owned())
    }

    fn name_string(&mut self) -> Result<String> {
        let mut out = String::new();
        match self.peek()? {
            b'\\' => {
                self.pos += 1;
                out.push('\\');
            }
            b'^' => {
                while self.peek()? == b'^' {
                    self.pos += 1;
                    out.push('^');
                }
            }
            _ => {}
        }
        let count = match self.peek()? {
            0x00 => {
                self.pos += 1;
                0
            }
            0x2E => {
                self.pos += 1;
                2
            }
            0x2F => {
                self.pos += 1;
                usize::from(self.u8()?)
            }
            _ => 1,
        };
        let segs = (0..count).map(|_| self.name_seg()).collect::<Result<Vec<_>>>()?;
        out.push_str(&segs.join("."));
        Ok(out)
    }

    fn value(&mut self) -> Result<Value> {
        let op = self.u8()?;
        let value = match op {
            0x00 => Value::Integer(0),
            0x01 => Value::Integer(1),
            0xFF => Value::Integer(u64::MAX),
            0x0A => Value::Integer(self.le(1)?),
            0x0B => Value::Integer(self.le(2)?),
            0x0C => Value::Integer(self.le(4)?),
            0x0E => Value::Integer(self.le(8)?),
            0x0D => {
                let rest = &self.data[self.pos..];
                let nul = rest
                    .iter()
                    .position(|&b| b == 0)
                    .ok_or_else(|| self.err("unterminated string"))?;
                let s = std::str::from_utf8(&rest[..nul])
                    .map_err(|_| self.err("non-UTF-8 string"))?;
                self.pos += nul + 1;
                Value::String(s.to_owned())
            }
            0x11 => {
                let end = self.pkg_end()?;
                let mut body = self.sub(end);
                let Value::Integer(size) = body.value()? else {
                    return Err(body.err("buffer size is not an integer"));
                };
                let init = &body.data[body.pos..end];
                if init.len() as u64 != size {
                    return Err(body.err("buffer size disagrees with its initializer"));
                }
                Value::Buffer(init.to_vec())
            }
            0x12 => {
                let end = self.pkg_end()?;
                let mut body = self.sub(end);
                let count = usize::from(body.u8()?);
                let mut elements = Vec::with_capacity(count);
                while !body.at_end() {
                    elements.push(body.value()?);
                }
                if elements.len() != count {
                    return Err(body.err("package element count mismatch"));
                }
                Value::Package(elements)
            }
            _ => {
                self.pos -= 1;
                return Err(self.err("unsupported data object"));
            }
        };
        Ok(value)
    }

    fn term(&mut self) -> Result<Term> {
        match self.u8()? {
            0x10 => {
                let end = self.pkg_end()?;
                let mut body = self.sub(end);
                let name = body.name_string()?;
                Ok(Term::Scope { name, body: body.terms()? })
            }
            0x08 => {
                let name = self.name_string()?;
                Ok(Term::Name { name, value: self.value()? })
            }
            0x14 => {
                let end = self.pkg_end()?;
                let mut body = self.sub(end);
                let name = body.name_string()?;
                let flags = body.u8()?;
                Ok(Term::Method { name, flags, body: body.data[body.pos..end].to_vec() })
            }
            0x5B if self.peek()? == 0x82 => {
                self.pos += 1;
                let end = self.pkg_end()?;
                let mut body = self.sub(end);
                let name = body.name_string()?;
                Ok(Term::Device { name, body: body.terms()? })
            }
            _ => {
                self.pos -= 1;
                Err(self.err("unsupported term"))
            }
        }
    }

    fn terms(&mut self) -> Result<Vec<Term>> {
        let mut terms = Vec::new();
        while !self.at_end() {
            terms.push(self.term()?);
        }
        Ok(terms)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Byte sum of `data`, modulo 256.
pub fn byte_sum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Decodes a complete table: validates the header length and checksum and
/// decodes the body terms.
pub fn decode_table(table: &[u8]) -> Result<(Header, Vec<Term>)> {
    let mut r = Reader::new(table);
    let header = Header {
        signature: r.bytes(4)?.try_into().map_err(|_| r.err("signature"))?,
        length: u32::try_from(r.le(4)?).map_err(|_| r.err("length"))?,
        revision: r.u8()?,
        checksum: r.u8()?,
        oem_id: r.bytes(6)?.try_into().map_err(|_| r.err("oem id"))?,
        oem_table_id: r.bytes(8)?.try_into().map_err(|_| r.err("oem table id"))?,
    };
    r.bytes(HEADER_LEN - r.pos)?;

    if header.length as usize != table.len() {
        return Err(DecodeError { offset: 4, what: "header length differs from table size" });
    }
    if byte_sum(table) != 0 {
        return Err(DecodeError { offset: 9, what: "checksum does not sum to zero" });
    }
    Ok((header, r.terms()?))
}

/// Decodes a bare AML term list (no header).
pub fn decode_terms(aml: &[u8]) -> Result<Vec<Term>> {
    Reader::new(aml).terms()
}

/// Decodes a single data object, requiring it to span all of `aml`.
pub fn decode_value(aml: &[u8]) -> Result<Value> {
    let mut r = Reader::new(aml);
    let value = r.value()?;
    if !r.at_end() {
        return Err(r.err("trailing bytes after data object"));
    }
    Ok(value)
}

/// Decodes a resource template up to and including its End Tag.
pub fn decode_resources(template: &[u8]) -> Result<Vec<Resource>> {
    let mut r = Reader::new(template);
    let mut out = Vec::new();
    loop {
        let tag = r.u8()?;
        let resource = match tag {
            0x79 => {
                r.u8()?;
                if !r.at_end() {
                    return Err(r.err("bytes after End Tag"));
                }
                return Ok(out);
            }
            0x47 => Resource::Io {
                info: r.u8()?,
                min: r.le(2)? as u16,
                max: r.le(2)? as u16,
                alignment: r.u8()?,
                length: r.u8()?,
            },
            0x4B => Resource::FixedIo { base: r.le(2)? as u16, length: r.u8()? },
            0x22 | 0x23 => {
                let mask = r.le(2)? as u16;
                let flags = if tag == 0x23 { r.u8()? } else { 0x01 };
                Resource::Irq { mask, flags }
            }
            0x2A => Resource::Dma { mask: r.u8()?, flags: r.u8()? },
            0x85 | 0x86 | 0x89 => {
                let len = r.le(2)? as usize;
                let end = r.pos + len;
                let resource = match tag {
                    0x85 => Resource::Memory32 {
                        info: r.u8()?,
                        min: r.le(4)? as u32,
                        max: r.le(4)? as u32,
                        alignment: r.le(4)? as u32,
                        length: r.le(4)? as u32,
                    },
                    0x86 => Resource::FixedMemory32 {
                        info: r.u8()?,
                        base: r.le(4)? as u32,
                        length: r.le(4)? as u32,
                    },
                    _ => {
                        let flags = r.u8()?;
                        if r.u8()? != 1 {
                            return Err(r.err("only single-GSI extended IRQs supported"));
                        }
                        Resource::ExtendedIrq { flags, gsi: r.le(4)? as u32 }
                    }
                };
                if r.pos != end {
                    return Err(r.err("large descriptor length mismatch"));
                }
                resource
            }
            _ => return Err(r.err("unsupported resource descriptor")),
        };
        out.push(resource);
    }
}

/// Finds the `Name` object called `name` directly inside `body`.
pub fn find_name<'a>(body: &'a [Term], name: &str) -> Option<&'a Value> {
    body.iter().find_map(|term| match term {
        Term::Name { name: n, value } if n == name => Some(value),
        _ => None,
    })
}
