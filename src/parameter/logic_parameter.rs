use crate::error::Error;
use serde_json::{Value, json};
use std::fmt;

/// One monotone-logic choice for a node with `n` inputs and `m` outputs.
///
/// The hex encoding unpacks to `m * 2^n` bits: bit `i * m + j` is set iff
/// input combination `i` drives the node's value past its `j`th output
/// threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicParameter {
    n: u64,
    m: u64,
    hex: String,
    comp: Vec<bool>,
}

impl LogicParameter {
    /// Unpack the hex encoding of a logic choice for `n` inputs and `m`
    /// outputs.
    ///
    /// # Panics
    ///
    /// Panics if `hex` contains a character outside `0-9A-F`.
    pub fn new(n: u64, m: u64, hex: &str) -> LogicParameter {
        let total = ((1u64 << n) * m) as usize;
        let mut comp = Vec::with_capacity(hex.len() * 4);
        for c in hex.chars().rev() {
            let digit = c
                .to_digit(16)
                .unwrap_or_else(|| panic!("invalid hex character `{c}` in logic encoding"));
            assert!(!c.is_ascii_lowercase(), "logic encodings use uppercase hex");
            comp.push(digit & 1 != 0);
            comp.push(digit & 2 != 0);
            comp.push(digit & 4 != 0);
            comp.push(digit & 8 != 0);
        }
        comp.resize(total, false);
        LogicParameter {
            n,
            m,
            hex: hex.to_string(),
            comp,
        }
    }

    /// Whether `input_combination` (one flag per ordered input) drives the
    /// node past threshold `output`.
    pub fn evaluate(&self, input_combination: &[bool], output: u64) -> bool {
        let mut index = 0u64;
        for (position, &flag) in input_combination.iter().enumerate() {
            if flag {
                index |= 1 << position;
            }
        }
        self.comp[(index * self.m + output) as usize]
    }

    /// Raw bit access into the unpacked encoding.
    pub fn bit(&self, index: u64) -> bool {
        self.comp[index as usize]
    }

    /// The output bin the target point lands in for the given input
    /// combination: the number of consecutive thresholds exceeded, in
    /// `[0, m]`.
    pub fn bin(&self, input_combination: u64) -> u64 {
        let start = (input_combination * self.m) as usize;
        self.comp[start..start + self.m as usize]
            .iter()
            .take_while(|&&b| b)
            .count() as u64
    }

    pub fn num_inputs(&self) -> u64 {
        self.n
    }

    pub fn num_outputs(&self) -> u64 {
        self.m
    }

    /// The hex encoding string.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// All encodings one bit flip away, valid or not; callers filter against
    /// their factor table.
    pub fn adjacencies(&self) -> Vec<LogicParameter> {
        let mut bits = self.comp.clone();
        let mut output = Vec::with_capacity(bits.len());
        for i in 0..bits.len() {
            bits[i] = !bits[i];
            output.push(LogicParameter::new(self.n, self.m, &hex_of(&bits, self.hex.len())));
            bits[i] = !bits[i];
        }
        output
    }

    /// Text form `[n,m,"hex"]`.
    pub fn stringify(&self) -> String {
        json!([self.n, self.m, self.hex]).to_string()
    }

    /// Parse the [`stringify`](LogicParameter::stringify) text form.
    pub fn parse(text: &str) -> Result<LogicParameter, Error> {
        let value: Value = serde_json::from_str(text)?;
        LogicParameter::from_value(&value)
    }

    pub(crate) fn from_value(value: &Value) -> Result<LogicParameter, Error> {
        let entry = value
            .as_array()
            .filter(|entry| entry.len() == 3)
            .ok_or(Error::TextForm {
                what: "logic parameter triple",
            })?;
        let n = entry[0].as_u64().ok_or(Error::TextForm { what: "input count" })?;
        let m = entry[1].as_u64().ok_or(Error::TextForm { what: "output count" })?;
        let hex = entry[2].as_str().ok_or(Error::TextForm { what: "hex encoding" })?;
        if !hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)) {
            return Err(Error::TextForm { what: "hex encoding" });
        }
        Ok(LogicParameter::new(n, m, hex))
    }
}

/// Re-encode an unpacked bit vector as uppercase hex of the given width.
fn hex_of(bits: &[bool], width: usize) -> String {
    let mut digits = Vec::new();
    for chunk in bits.chunks(4) {
        let mut digit = 0u32;
        for (position, &bit) in chunk.iter().enumerate() {
            if bit {
                digit |= 1 << position;
            }
        }
        digits.push(char::from_digit(digit, 16).expect("nybble").to_ascii_uppercase());
    }
    while digits.len() < width {
        digits.push('0');
    }
    digits.reverse();
    digits.into_iter().collect()
}

impl fmt::Display for LogicParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}
