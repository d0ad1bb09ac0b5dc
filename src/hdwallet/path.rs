/*
    This module helps with parsing deriveration paths passed in as strings
    as vectors of ChildOptions that can be used to derive a child key.

    Paths start at "m" and list one index per level. A trailing `'`, `h`
    or `H` marks a hardened index, eg. m/44'/20'/0'/0/5.
*/

use crate::{
    error::{KeyError, KeyResult},
    hdwallet::{ChildOptions, HARDENED_KEY_START},
};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub children: Vec<ChildOptions>,
}

impl Path {
    pub fn empty() -> Self {
        Self { children: vec![] }
    }

    /// Adds one level below the current path.
    pub fn push(mut self, child: ChildOptions) -> Self {
        self.children.push(child);
        self
    }
}

impl FromStr for Path {
    type Err = KeyError;

    fn from_str(path: &str) -> KeyResult<Self> {
        let bad_path = || KeyError::BadPath(path.to_string());

        let mut levels = path.split('/');
        if levels.next() != Some("m") {
            return Err(bad_path());
        }

        let mut children: Vec<ChildOptions> = vec![];
        for level in levels {
            let (digits, hardened) = match level.strip_suffix(&['\'', 'h', 'H'][..]) {
                Some(digits) => (digits, true),
                None => (level, false),
            };

            //Reject signs and empty levels that u32 parsing would let through
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad_path());
            }
            let index: u32 = digits.parse().map_err(|_| bad_path())?;
            if index >= HARDENED_KEY_START {
                return Err(bad_path());
            }

            children.push(if hardened {
                ChildOptions::Hardened(index)
            } else {
                ChildOptions::Normal(index)
            });
        }

        Ok(Self { children })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for child in self.children.iter() {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}
