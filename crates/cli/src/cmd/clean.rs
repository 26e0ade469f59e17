//! Print a sanitized name

use anyhow::Result;
use refile_core::{clean_directory_name, clean_file_name};

pub fn run(text: &str, dir: bool) -> Result<()> {
    let cleaned = if dir {
        clean_directory_name(text)
    } else {
        clean_file_name(text)
    };
    println!("{}", cleaned);
    Ok(())
}
