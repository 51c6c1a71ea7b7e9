//! Pointer scripts: recorded pointer samples, one per line.
//!
//! ```text
//! # kind x y timestamp_ms
//! down 10 10 0
//! move 11.5 10 40
//! up 11.5 10 90
//! ```

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{space0, space1, u64 as timestamp},
    combinator::{all_consuming, map, value},
    number::complete::float,
    sequence::{delimited, tuple},
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};
use crate::gesture::{PointerKind, PointerSample};

fn pointer_kind(input: &str) -> IResult<&str, PointerKind> {
    alt((
        value(PointerKind::Down, tag("down")),
        value(PointerKind::Move, tag("move")),
        value(PointerKind::Up, tag("up")),
    ))(input)
}

fn pointer_sample(input: &str) -> IResult<&str, PointerSample> {
    map(
        delimited(
            space0,
            tuple((pointer_kind, space1, float, space1, float, space1, timestamp)),
            space0,
        ),
        |(kind, _, x, _, y, _, ts)| PointerSample::new(kind, x, y, ts),
    )(input)
}

pub fn parse_line(line: &str) -> Result<Option<PointerSample>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (_, sample) = all_consuming(pointer_sample)(trimmed)?;
    Ok(Some(sample))
}

pub fn parse(input: &str) -> Result<Vec<PointerSample>> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match parse_line(line) {
            Ok(sample) => sample.map(Ok),
            Err(err) => Some(Err(Error::new(
                ErrorKind::ScriptParse,
                &format!("line {}: {}", idx + 1, err.message.unwrap_or_default()),
            ))),
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<PointerSample>> {
    let content = fs::read_to_string(path)?;
    let samples = parse(&content)?;

    log::debug!(
        "loaded {} pointer samples from '{}'",
        samples.len(),
        path.display()
    );

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_samples_and_skips_comments() {
        let script = "# tap on the previous month button\n\
                      down 10 10 0\n\
                      \n\
                      move 11.5 10.25 40\n\
                      up 11.5 10.25 90\n";

        let samples = parse(script).unwrap();

        assert_eq!(
            samples,
            vec![
                PointerSample::new(PointerKind::Down, 10.0, 10.0, 0),
                PointerSample::new(PointerKind::Move, 11.5, 10.25, 40),
                PointerSample::new(PointerKind::Up, 11.5, 10.25, 90),
            ]
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(
            parse_line("   up   1 2   3  ").unwrap(),
            Some(PointerSample::new(PointerKind::Up, 1.0, 2.0, 3))
        );
    }

    #[test]
    fn reports_line_of_bad_sample() {
        let err = parse("down 1 1 0\nhover 1 1 5\n").unwrap_err();

        assert!(matches!(err.kind, ErrorKind::ScriptParse));
        assert!(err.message.unwrap().starts_with("line 2:"));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_line("down 1 1 0 extra").is_err());
        assert!(parse_line("down 1 1").is_err());
    }
}
