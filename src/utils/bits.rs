/// MSB-first bit packer with an 8-bit accumulator.
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    acc: u8,
    held: u8,
    total_bits: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.acc = (self.acc << 1) | bit as u8;
        self.held += 1;
        self.total_bits += 1;

        if self.held == 8 {
            self.out.push(self.acc);
            self.acc = 0;
            self.held = 0;
        }
    }

    pub fn push_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push_bit(bit);
        }
    }

    /// Pushes all eight bits of `byte`, high bit first.
    pub fn push_byte(&mut self, byte: u8) {
        for shift in (0..8).rev() {
            self.push_bit((byte >> shift) & 1 == 1);
        }
    }

    /// Zero-pads any residual bits to a full byte and returns the packed
    /// bytes with the count of meaningful bits.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        if self.held > 0 {
            self.acc <<= 8 - self.held;
            self.out.push(self.acc);
            self.acc = 0;
            self.held = 0;
        }
        (self.out, self.total_bits)
    }
}

/// MSB-first reader over a byte slice, bounded by a bit limit.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: u64,
    limit: u64,
}

impl<'a> BitReader<'a> {
    /// Reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            limit: data.len() as u64 * 8,
        }
    }

    /// Reader that stops after `limit` bits, never past the end of `data`.
    pub fn with_limit(data: &'a [u8], limit: u64) -> Self {
        Self {
            data,
            pos: 0,
            limit: limit.min(data.len() as u64 * 8),
        }
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        if self.pos >= self.limit {
            return None;
        }
        let byte = self.data[(self.pos / 8) as usize];
        let bit = (byte >> (7 - (self.pos % 8))) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        if self.remaining() < 8 {
            return None;
        }
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | self.read_bit()? as u8;
        }
        Some(value)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.pos
    }

    /// Number of whole bytes touched so far.
    pub fn bytes_consumed(&self) -> usize {
        self.pos.div_ceil(8) as usize
    }
}
