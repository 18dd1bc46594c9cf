use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ParseError;

use super::model::Spectrum;

/// Marker tokens delimiting the data region of header-bearing files.
const BEGIN_MARKER: &str = "Begin";
const END_MARKER: &str = "End";

/// Options consumed by the parser. `min_nm`/`max_nm` form an inclusive
/// wavelength filter; lines past `max_nm` terminate scanning early (the
/// instruments emit ascending wavelengths).
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub min_nm: f64,
    pub max_nm: f64,
    /// Whether the file wraps its data region in `Begin`/`End` marker lines.
    pub has_header: bool,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read one instrument file into a [`Spectrum`] plus its sample label.
///
/// The label is the file stem: `specs/anole_04.transmission` → `anole_04`.
pub fn parse_file(path: &Path, opts: &ParseOptions) -> Result<(Spectrum, String), ParseError> {
    let file = File::open(path)?;
    let spectrum = parse_reader(BufReader::new(file), opts)?;
    Ok((spectrum, label_for(path)))
}

/// Parse line-oriented instrument text from any reader.
///
/// Each data line is whitespace-separated `wavelength reflectance [...]`;
/// tokens past the second are ignored. With `has_header`, only lines
/// strictly between a `Begin` marker line and an `End` marker line are
/// data; everything outside the region is ignored regardless of content.
pub fn parse_reader<R: BufRead>(reader: R, opts: &ParseOptions) -> Result<Spectrum, ParseError> {
    let mut nanometers = Vec::new();
    let mut reflectances = Vec::new();
    let mut in_data = !opts.has_header;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        if opts.has_header {
            if line.contains(END_MARKER) {
                break;
            }
            if !in_data {
                if line.contains(BEGIN_MARKER) {
                    in_data = true;
                }
                continue;
            }
        }

        let (nm, reflectance) = parse_data_line(&line, line_no)?;
        if nm > opts.max_nm {
            break;
        }
        if nm >= opts.min_nm {
            nanometers.push(nm);
            reflectances.push(reflectance);
        }
    }

    if nanometers.is_empty() {
        return Err(ParseError::Empty {
            min_nm: opts.min_nm,
            max_nm: opts.max_nm,
        });
    }

    Ok(Spectrum {
        nanometers,
        reflectances,
    })
}

/// Derive the sample label from a file path: directory and extension
/// stripped.
pub fn label_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

fn parse_data_line(line: &str, line_no: usize) -> Result<(f64, f64), ParseError> {
    let mut tokens = line.split_whitespace();
    let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
        return Err(ParseError::MalformedLine {
            line: line_no,
            got: line.trim().to_string(),
        });
    };
    let nm = parse_float(first, line_no)?;
    let reflectance = parse_float(second, line_no)?;
    Ok((nm, reflectance))
}

fn parse_float(token: &str, line_no: usize) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::BadNumber {
        line: line_no,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use super::*;

    fn opts(min_nm: f64, max_nm: f64, has_header: bool) -> ParseOptions {
        ParseOptions {
            min_nm,
            max_nm,
            has_header,
        }
    }

    #[test]
    fn parses_headerless_file() {
        let text = "300.1 12.5\n301.2 13.0 extra junk\n302.0 13.4\n";
        let sp = parse_reader(Cursor::new(text), &opts(300.0, 700.0, false)).unwrap();
        assert_eq!(sp.nanometers, vec![300.1, 301.2, 302.0]);
        assert_eq!(sp.reflectances, vec![12.5, 13.0, 13.4]);
    }

    #[test]
    fn honors_begin_end_markers() {
        let text = "\
Instrument: USB2000
Date: whenever
>>>>>Begin Spectral Data<<<<<
350.0 1.0
351.0 2.0
>>>>>End Spectral Data<<<<<
this is not data and would not parse
";
        let sp = parse_reader(Cursor::new(text), &opts(300.0, 700.0, true)).unwrap();
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.nanometers, vec![350.0, 351.0]);
    }

    #[test]
    fn range_filter_is_inclusive_both_ends() {
        let text = "399.0 1.0\n400.0 2.0\n500.0 3.0\n600.0 4.0\n600.5 5.0\n";
        let sp = parse_reader(Cursor::new(text), &opts(400.0, 600.0, false)).unwrap();
        assert_eq!(sp.nanometers, vec![400.0, 500.0, 600.0]);
    }

    #[test]
    fn stops_scanning_past_max() {
        // The line after the out-of-range one is malformed; early
        // termination means it is never inspected.
        let text = "400.0 1.0\n650.0 2.0\ngarbage\n";
        let sp = parse_reader(Cursor::new(text), &opts(400.0, 600.0, false)).unwrap();
        assert_eq!(sp.nanometers, vec![400.0]);
    }

    #[test]
    fn short_line_is_malformed() {
        let err = parse_reader(Cursor::new("400.0\n"), &opts(300.0, 700.0, false)).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let err =
            parse_reader(Cursor::new("400.0 abc\n"), &opts(300.0, 700.0, false)).unwrap_err();
        assert!(matches!(err, ParseError::BadNumber { line: 1, ref token } if token == "abc"));
    }

    #[test]
    fn empty_result_is_an_error() {
        let err =
            parse_reader(Cursor::new("100.0 1.0\n"), &opts(300.0, 700.0, false)).unwrap_err();
        assert!(matches!(err, ParseError::Empty { .. }));
    }

    #[test]
    fn label_strips_directory_and_extension() {
        assert_eq!(label_for(Path::new("specs/anole_04.transmission")), "anole_04");
        assert_eq!(label_for(Path::new("dewlap_12.txt")), "dewlap_12");
        assert_eq!(label_for(Path::new("sample.b")), "sample");
    }
}
