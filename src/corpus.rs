use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::MeteorError;
use crate::utils::Sequence;

pub const FIELD_SEPARATOR: &str = " ||| ";

/// Two competing hypotheses and the reference they are judged against.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub first: Sequence,
    pub second: Sequence,
    pub reference: Sequence,
}

impl Triple {
    pub fn parse(line: &str, line_no: usize) -> Result<Self, MeteorError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        match fields.as_slice() {
            [first, second, reference] => Ok(Triple {
                first: Sequence::new(first),
                second: Sequence::new(second),
                reference: Sequence::new(reference),
            }),
            _ => Err(MeteorError::MalformedLine {
                line: line_no,
                fields: fields.len(),
            }),
        }
    }
}

/// Reads one [`Triple`] per line of `hyp1 ||| hyp2 ||| ref` input.
pub struct TripleReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl TripleReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, MeteorError> {
        let file = File::open(path).map_err(|e| MeteorError::io("opening input", e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TripleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TripleReader<R> {
    type Item = Result<Triple, MeteorError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some(
            line.map_err(|e| MeteorError::io("reading input", e))
                .and_then(|line| Triple::parse(line.trim_end_matches('\r'), self.line_no)),
        )
    }
}
