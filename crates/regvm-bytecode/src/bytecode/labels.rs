//! Address-to-name label tables.
//!
//! Text format, one label per line, sorted by address:
//! ```text
//! 00000005   main
//! 0000001a   loop
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Separator between address and name in the text format.
const SEPARATOR: &str = "   ";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("line {line}: expected `ADDR   NAME`")]
    Malformed { line: usize },

    #[error("line {line}: invalid address `{addr}`")]
    InvalidAddress { line: usize, addr: String },
}

/// Bidirectional label lookup, ordered by address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    by_addr: BTreeMap<u32, String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text format. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let mut table = Self::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((addr, name)) = line.split_once(SEPARATOR) else {
                return Err(LabelError::Malformed { line: idx + 1 });
            };
            let addr = u32::from_str_radix(addr.trim(), 16).map_err(|_| {
                LabelError::InvalidAddress {
                    line: idx + 1,
                    addr: addr.to_string(),
                }
            })?;
            table.insert(addr, name.trim().to_string());
        }
        Ok(table)
    }

    /// Render the text format.
    pub fn format(&self) -> String {
        let mut out = String::new();
        for (addr, name) in &self.by_addr {
            writeln!(out, "{addr:08x}{SEPARATOR}{name}").unwrap();
        }
        out
    }

    /// Insert a label, replacing any existing name at `addr`.
    pub fn insert(&mut self, addr: u32, name: String) {
        self.by_addr.insert(addr, name);
    }

    pub fn name_at(&self, addr: u32) -> Option<&str> {
        self.by_addr.get(&addr).map(|s| s.as_str())
    }

    pub fn address_of(&self, name: &str) -> Option<u32> {
        self.by_addr
            .iter()
            .find_map(|(addr, n)| (n == name).then_some(*addr))
    }

    pub fn len(&self) -> usize {
        self.by_addr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_addr.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.by_addr.iter().map(|(addr, name)| (*addr, name.as_str()))
    }
}
