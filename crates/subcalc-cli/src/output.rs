//! Result rendering for the terminal

use colored::Colorize;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use subcalc_cidr::tools::{HostFit, StfMapping};
use subcalc_cidr::{write_response, Block, RangeEnumerator, Summary};
use subcalc_core::{AddressFamily, Result};

const LABEL_WIDTH: usize = 13;
const HOSTS_LABEL_WIDTH: usize = 17;
const STF_LABEL_WIDTH: usize = 21;

/// Output style selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Labelled lines; labels are bold when `color` is set
    Human { color: bool },
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON, identical to the HTTP body
    JsonCompact,
}

#[derive(Serialize)]
struct HostsReport {
    theoretical_len: f64,
    working_len: u32,
    hosts: String,
}

#[derive(Serialize)]
struct ReverseReport<'a> {
    name: &'a str,
    hostname: &'a str,
}

#[derive(Serialize)]
struct StfReport {
    network: String,
    parent: String,
}

fn label(text: &str, width: usize, color: bool) -> String {
    let padded = format!("{:<width$}", text, width = width);
    if color {
        padded.bold().to_string()
    } else {
        padded
    }
}

/// Encoding happens before any byte is written, so a closed sink is a
/// `SinkFailure` and never an `EncodeFailure`.
fn json_line<W: Write, T: Serialize>(out: &mut W, value: &T, style: Style) -> Result<()> {
    let mut encoded = if style == Style::Json {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    encoded.push(b'\n');
    out.write_all(&encoded)?;
    Ok(())
}

/// Write a block summary, followed by every address when enumerating
pub fn write_block<W: Write>(
    out: &mut W,
    block: &Block,
    enumerator: Option<RangeEnumerator>,
    style: Style,
) -> Result<()> {
    match style {
        Style::Human { color } => write_block_human(out, block, enumerator, color)?,
        Style::Json if enumerator.is_none() => json_line(out, &Summary::from(block), style)?,
        Style::Json | Style::JsonCompact => {
            write_response(block, enumerator, &mut *out)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_block_human<W: Write>(
    out: &mut W,
    block: &Block,
    enumerator: Option<RangeEnumerator>,
    color: bool,
) -> Result<()> {
    let lead = if enumerator.is_some() { "; " } else { "" };
    let mut line = |name: &str, value: &dyn Display| {
        writeln!(out, "{}{}{}", lead, label(name, LABEL_WIDTH, color), value)
    };

    line("range:", &format_args!("{} > {}", block.first(), block.last()))?;
    if let Some((first, last)) = block.range_u32() {
        line("range b10:", &format_args!("{} > {}", first, last))?;
        line("range b16:", &format_args!("{:#x} > {:#x}", first, last))?;
    }
    line("hosts:", &block.host_count())?;
    line("prefixlen:", &block.prefix())?;
    match block.family() {
        AddressFamily::Inet => {
            line("netmask:", &block.netmask())?;
            line("mask:", &block.wildcard())?;
        }
        AddressFamily::Inet6 => line("mask:", &block.netmask())?,
    }

    if let Some(range) = enumerator {
        for address in range {
            writeln!(out, "{}", address)?;
        }
    }
    Ok(())
}

/// Write the result of a host-count discovery
pub fn write_hosts<W: Write>(out: &mut W, fit: &HostFit, style: Style) -> Result<()> {
    match style {
        Style::Human { color } => {
            writeln!(
                out,
                "{}{:.30}",
                label("theoretical len:", HOSTS_LABEL_WIDTH, color),
                fit.theoretical_len()
            )?;
            writeln!(
                out,
                "{}{}",
                label("working len:", HOSTS_LABEL_WIDTH, color),
                fit.prefix_len()
            )?;
            writeln!(
                out,
                "{}{}",
                label("hosts:", HOSTS_LABEL_WIDTH, color),
                fit.block_size()
            )?;
        }
        Style::Json | Style::JsonCompact => {
            let report = HostsReport {
                theoretical_len: fit.theoretical_len(),
                working_len: fit.prefix_len(),
                hosts: fit.block_size(),
            };
            json_line(out, &report, style)?;
        }
    }
    Ok(())
}

/// Write a reverse DNS pointer record
pub fn write_reverse<W: Write>(out: &mut W, name: &str, hostname: &str, style: Style) -> Result<()> {
    match style {
        Style::Human { .. } => writeln!(out, "{}\tIN\tPTR\t{}", name, hostname)?,
        Style::Json | Style::JsonCompact => {
            json_line(out, &ReverseReport { name, hostname }, style)?;
        }
    }
    Ok(())
}

/// Write a 6to4 mapping
pub fn write_stf<W: Write>(out: &mut W, mapping: &StfMapping, style: Style) -> Result<()> {
    match style {
        Style::Human { color } => {
            writeln!(
                out,
                "{}{}",
                label("6to4 network:", STF_LABEL_WIDTH, color),
                mapping.network()
            )?;
            writeln!(
                out,
                "{}{}",
                label("ip version 4 parent:", STF_LABEL_WIDTH, color),
                mapping.parent()
            )?;
        }
        Style::Json | Style::JsonCompact => {
            let report = StfReport {
                network: mapping.network(),
                parent: mapping.parent().to_string(),
            };
            json_line(out, &report, style)?;
        }
    }
    Ok(())
}
