//! Shared imports for the command modules.

pub use crate::error::Error;

pub use anstream::{eprintln, println};

pub use color_eyre::eyre::{eyre, Context, OptionExt, Result};

pub use std::format as f;
