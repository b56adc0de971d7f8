use crate::dbc::core;
use crate::dbc::types::database::Database;
use crate::dbc::types::errors::ParseError;

use std::fs::File;
use std::io::{BufReader, Read};

use encoding_rs::WINDOWS_1252;

/// Parses a DBC file and returns a populated [`Database`] instance.
///
/// This function reads a DBC file from disk, parses its content line by line,
/// and fills the [`Database`] structure with all parsed information:
/// - **Version** (from the `VERSION` line)
/// - **Messages** (from `BO_` lines) and their **Signals** (from `SG_` lines)
/// - **Value descriptions** (from `VAL_` lines)
/// - **BusType** (from the `BA_ "BusType"` line)
/// - **Initial values** (from the `GenSigStartValue` attribute lines)
/// - **IEEE value types** (from `SIG_VALTYPE_` lines)
///
/// Unknown top-level keywords are skipped so future DBC extensions do not
/// break loading, but structural defects in the recognised line forms abort
/// immediately with a typed [`ParseError`]. Before returning, initial values
/// are range-checked against each signal's `[min, max]`.
///
/// # Parameters
/// - `path`: Path to the `.dbc` file to parse.
///
/// # Returns
/// - `Ok(Database)` if the file was successfully read and parsed.
/// - `Err(ParseError)` carrying the defect and its line otherwise.
pub fn from_file(path: &str) -> Result<Database, ParseError> {
    // check if provided file has .dbc format
    if !path.ends_with(".dbc") {
        return Err(ParseError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|e| ParseError::OpenFile {
        path: path.to_string(),
        source: e,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    // read raw bytes
    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ParseError::Read {
            path: path.to_string(),
            source: e,
        })?;

    // Decode in Windows-1252
    let (text, _, _) = WINDOWS_1252.decode(&bytes);

    // Swap german chars with utf-8 chars
    let mut text: String = text.into_owned();
    text = text
        .replace('ü', "u")
        .replace('ö', "o")
        .replace('ä', "a")
        .replace('ß', "ss")
        .replace('Ü', "U")
        .replace('Ö', "O")
        .replace('Ä', "A")
        .replace('¿', "?");

    parse_lines(&text)
}

/// Parses DBC text that is already in memory. `from_file` delegates here
/// after decoding; tests use it directly.
pub fn parse_lines(text: &str) -> Result<Database, ParseError> {
    // split text in lines
    let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();

    // Initialize Database and row counter
    let mut db: Database = Database::default();
    let mut i: usize = 0;

    while i < lines.len() {
        // Work on a trimmed-start slice to preserve inner spaces
        let line: &str = lines[i].trim_start();

        // skip comments and empty lines
        if line.is_empty() || line.starts_with("//") {
            i += 1;
            continue;
        }

        // Extract first and second token from the line
        let mut parts = line.split_ascii_whitespace();
        let first: &str = parts.next().unwrap_or("");
        let second: &str = parts.next().unwrap_or("");

        match first {
            "VERSION" => {
                core::version::decode(&mut db, line);
            }
            "NS_" => {
                // skip the new-symbols block until the bit-timing marker
                while i + 1 < lines.len() {
                    let next: &str = lines[i + 1].trim_start();
                    let tok: &str = next.split_ascii_whitespace().next().unwrap_or("");
                    if tok == "BS_:" || tok == "BS_" {
                        break;
                    }
                    i += 1;
                }
            }
            "BO_" => {
                core::bo_::decode(&mut db, &lines, &mut i)?;
            }
            "VAL_" => {
                core::val_::decode(&mut db, line)?;
            }
            "BA_DEF_" => {
                if second == "SG_" {
                    core::attributes::ba_def_sg_::decode(&mut db, line)?;
                }
            }
            "BA_DEF_DEF_" => {
                core::attributes::ba_def_def_::decode(&mut db, line)?;
            }
            "BA_" => {
                core::attributes::ba_::decode(&mut db, line)?;
            }
            "SIG_VALTYPE_" => {
                core::attributes::sig_valtype_::decode(&mut db, line)?;
            }
            // a SG_ here is outside any BO_ block; discard like any other
            // unrecognised keyword
            _ => {}
        }

        i += 1;
    }

    db.consistency_check()?;
    Ok(db)
}
