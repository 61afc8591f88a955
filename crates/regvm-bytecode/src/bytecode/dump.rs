//! Human-readable disassembly of a program image.
//!
//! Linear sweep over the trampoline slot and the code that follows it.
//! Branch and call targets are labeled either from a [`LabelTable`] or
//! with generated `.l1`, `.l2`, ... names in address order.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::colors::Colors;

use super::constants::TRAMPOLINE_SIZE;
use super::format::{LineBuilder, format_instruction};
use super::instructions::Instruction;
use super::labels::LabelTable;

/// Prefix of generated label names.
pub const AUTO_LABEL_PREFIX: &str = ".l";

/// Disassemble `image`, generating labels for branch targets.
pub fn dump(image: &[u8], colors: Colors) -> String {
    let items = sweep(image);
    let labels = auto_labels(&items);
    render(image, &items, &labels, colors)
}

/// Disassemble `image`, naming branch targets from `labels`.
pub fn dump_with_labels(image: &[u8], labels: &LabelTable, colors: Colors) -> String {
    let items = sweep(image);
    let labels = labels
        .iter()
        .map(|(addr, name)| (addr, name.to_string()))
        .collect();
    render(image, &items, &labels, colors)
}

/// One decoded unit of the sweep.
#[derive(Clone, Copy, Debug)]
struct Item {
    addr: u32,
    size: usize,
    instr: Option<Instruction>,
}

/// Decode the trampoline slot and the code area as separate runs so a
/// malformed slot cannot misalign the code that follows.
fn sweep(image: &[u8]) -> Vec<Item> {
    let split = TRAMPOLINE_SIZE.min(image.len());
    let mut items = Vec::new();
    sweep_range(image, 0, split, &mut items);
    sweep_range(image, split, image.len(), &mut items);
    items
}

fn sweep_range(image: &[u8], start: usize, end: usize, items: &mut Vec<Item>) {
    let mut addr = start;
    while addr < end {
        let item = match Instruction::decode(&image[addr..end]) {
            Ok(instr) => Item {
                addr: addr as u32,
                size: instr.size(),
                instr: Some(instr),
            },
            Err(_) => Item {
                addr: addr as u32,
                size: 1,
                instr: None,
            },
        };
        addr += item.size;
        items.push(item);
    }
}

/// Label every branch target that starts a decoded instruction.
fn auto_labels(items: &[Item]) -> BTreeMap<u32, String> {
    let starts: Vec<u32> = items
        .iter()
        .filter(|i| i.instr.is_some())
        .map(|i| i.addr)
        .collect();

    let mut targets: Vec<u32> = items
        .iter()
        .filter_map(|i| i.instr.and_then(|instr| instr.branch_target()))
        .filter(|t| starts.binary_search(t).is_ok())
        .collect();
    targets.sort_unstable();
    targets.dedup();

    targets
        .into_iter()
        .enumerate()
        .map(|(idx, addr)| (addr, format!("{AUTO_LABEL_PREFIX}{}", idx + 1)))
        .collect()
}

fn render(
    image: &[u8],
    items: &[Item],
    labels: &BTreeMap<u32, String>,
    colors: Colors,
) -> String {
    let c = &colors;
    let builder = LineBuilder::new(colors);
    let mut out = String::new();

    for item in items {
        let addr = item.addr as usize;
        if addr == 0 {
            writeln!(out, "{}[trampoline]{}", c.blue, c.reset).unwrap();
        } else if addr == TRAMPOLINE_SIZE {
            if !out.is_empty() {
                out.push('\n');
            }
            writeln!(out, "{}[code]{}", c.blue, c.reset).unwrap();
        }

        if let Some(name) = labels.get(&item.addr) {
            writeln!(out, "{}", builder.label_line(name)).unwrap();
        }

        let raw = &image[addr..addr + item.size];
        let content = match item.instr {
            Some(instr) => {
                let target = instr
                    .branch_target()
                    .and_then(|t| labels.get(&t))
                    .map(|s| s.as_str());
                format_instruction(&instr, target, colors)
            }
            None => format!(".byte {:#04x}", raw[0]),
        };
        writeln!(out, "{}", builder.instruction_line(item.addr, raw, &content)).unwrap();
    }

    out
}
