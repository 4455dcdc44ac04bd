use crate::error::GenerateError;
use log::debug;
use std::io::{IsTerminal, Read};
use std::path::Path;

/// Reads the specification from `path`, or from standard input when no path is
/// given.
///
/// Standard input attached to a terminal is rejected rather than waited on.
pub fn read_specification(path: Option<&Path>) -> Result<Vec<u8>, GenerateError> {
    match path {
        Some(path) => read_file(path),
        None => read_stdin(),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, GenerateError> {
    if !path.exists() {
        return Err(GenerateError::input_not_found(path));
    }
    debug!("Reading specification from {}", path.display());
    match std::fs::read(path) {
        Ok(content) => Ok(content),
        Err(e) => Err(GenerateError::input_unavailable(&e)),
    }
}

fn read_stdin() -> Result<Vec<u8>, GenerateError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(GenerateError::input_unavailable(
            "standard input is a terminal, pass a file or pipe the specification in",
        ));
    }
    debug!("Reading specification from standard input");
    let mut content = Vec::new();
    match stdin.lock().read_to_end(&mut content) {
        Ok(_) => Ok(content),
        Err(e) => Err(GenerateError::input_unavailable(&e)),
    }
}
