//! `--fault ADDR:XORMASK` parsing.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// A word whose reads come back with `mask` bits flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectedFault {
    pub addr: u32,
    pub mask: u32,
}

fn parse_u32(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.with_context(|| format!("'{}' is not a 32-bit number", text))
}

impl FromStr for InjectedFault {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((addr, mask)) = s.split_once(':') else {
            bail!("expected ADDR:XORMASK, got '{}'", s);
        };
        let addr = parse_u32(addr).context("bad fault address")?;
        let mask = parse_u32(mask).context("bad fault mask")?;
        if addr % 4 != 0 {
            bail!("fault address {:#010x} is not word aligned", addr);
        }
        if mask == 0 {
            bail!("fault mask for {:#010x} flips no bits", addr);
        }
        Ok(InjectedFault { addr, mask })
    }
}

impl fmt::Display for InjectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}:{:#x}", self.addr, self.mask)
    }
}
