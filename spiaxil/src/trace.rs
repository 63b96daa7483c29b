//! Waveform traces.
//!
//! A [`Trace`] records signals cycle by cycle under hierarchical, `.`-separated names and
//! renders them as a Value Change Dump that any waveform viewer can open.

use std::fmt::Write as _;
use std::path::Path;
use std::{fs, io};

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use thiserror::Error;

use crate::*;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("file system error: {error:?}")]
    Fs { error: io::Error },
}

#[derive(Debug, Clone)]
struct Var {
    id: String,
    width: usize,
    last: Vec<bool>,
}

#[derive(Debug, Clone)]
struct Change {
    time: u64,
    id: String,
    bits: Vec<bool>,
}

/// Waveform trace.
#[derive(Debug, Clone)]
pub struct Trace {
    timescale: String,
    time: u64,
    /// Leaf signals in registration order.
    vars: LinkedHashMap<String, Var>,
    changes: Vec<Change>,
}

impl Default for Trace {
    fn default() -> Self { Self::new("1ns") }
}

/// Returns the VCD identifier code of the `index`-th variable.
fn vcd_id(index: usize) -> String {
    const FIRST: u8 = b'!';
    const RADIX: usize = (b'~' - b'!' + 1) as usize;

    let mut index = index;
    let mut id = String::new();
    loop {
        id.push((FIRST + (index % RADIX) as u8) as char);
        index /= RADIX;
        if index == 0 {
            break id;
        }
        index -= 1;
    }
}

impl Trace {
    /// Creates an empty trace; one cycle lasts one `timescale` unit (e.g. `"10ns"`).
    pub fn new(timescale: &str) -> Self {
        Self { timescale: timescale.to_string(), time: 0, vars: LinkedHashMap::new(), changes: Vec::new() }
    }

    /// Returns the current cycle.
    pub fn time(&self) -> u64 { self.time }

    /// Moves to the next cycle.
    pub fn step(&mut self) { self.time += 1; }

    /// Records `value` under `name` for the current cycle.
    ///
    /// A signal is registered the first time it is recorded. Only changes are stored.
    pub fn record<V: Signal>(&mut self, name: &str, value: &V) {
        let bits = value.transl();
        let mut offset = 0;

        for (leaf, width) in V::port_decls().flatten(name) {
            let slice = some_or!(bits.get(offset..offset + width), break).to_vec();
            offset += width;

            let next_id = vcd_id(self.vars.len());
            let var = self.vars.entry(leaf).or_insert_with(|| Var { id: next_id, width, last: Vec::new() });
            if var.last != slice {
                self.changes.push(Change { time: self.time, id: var.id.clone(), bits: slice.clone() });
                var.last = slice;
            }
        }
    }

    /// Returns the registered leaf signals and their widths, in registration order.
    pub fn signals(&self) -> impl Iterator<Item = (&str, usize)> { self.vars.iter().map(|(n, v)| (n.as_str(), v.width)) }

    /// Returns the most recently recorded value of a leaf signal.
    pub fn last(&self, name: &str) -> Option<u64> { self.vars.get(name).map(|var| bits_to_u64(&var.last)) }

    /// Returns the cycles at which a leaf signal changed, with its new value.
    pub fn history(&self, name: &str) -> Vec<(u64, u64)> {
        let id = some_or!(self.vars.get(name), return vec![]).id.as_str();
        self.changes.iter().filter(|c| c.id == id).map(|c| (c.time, bits_to_u64(&c.bits))).collect()
    }

    /// Renders the trace as a Value Change Dump.
    pub fn to_vcd(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "$version spiaxil $end");
        let _ = writeln!(out, "$timescale {} $end", self.timescale);

        let mut scopes: Vec<&str> = vec![];
        for (name, var) in self.vars.iter() {
            let path = name.split('.').collect::<Vec<_>>();
            let (reference, path) = some_or!(path.split_last(), continue);

            let common = scopes.iter().zip(path.iter()).take_while(|(a, b)| a == b).count();
            for _ in common..scopes.len() {
                let _ = writeln!(out, "$upscope $end");
            }
            scopes.truncate(common);
            for scope in &path[common..] {
                let _ = writeln!(out, "$scope module {} $end", scope);
                scopes.push(*scope);
            }
            let _ = writeln!(out, "$var wire {} {} {} $end", var.width, var.id, reference);
        }
        for _ in 0..scopes.len() {
            let _ = writeln!(out, "$upscope $end");
        }
        let _ = writeln!(out, "$enddefinitions $end");

        for (time, changes) in &self.changes.iter().group_by(|c| c.time) {
            let _ = writeln!(out, "#{}", time);
            for change in changes {
                let value = change.bits.iter().rev().map(|b| if *b { '1' } else { '0' }).collect::<String>();
                if change.bits.len() == 1 {
                    let _ = writeln!(out, "{}{}", value, change.id);
                } else {
                    let _ = writeln!(out, "b{} {}", value, change.id);
                }
            }
        }
        if self.changes.last().map_or(true, |c| c.time < self.time) {
            let _ = writeln!(out, "#{}", self.time);
        }
        out
    }

    /// Writes the trace as a Value Change Dump file, creating parent directories.
    pub fn write_vcd(&self, path: &Path) -> Result<(), TraceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| TraceError::Fs { error })?;
        }
        fs::write(path, self.to_vcd()).map_err(|error| TraceError::Fs { error })
    }
}
