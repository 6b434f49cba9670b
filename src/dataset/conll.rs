//! CoNLL-X reader.
//!
//! Each token line holds ten tab-separated columns
//! (ID FORM LEMMA CPOSTAG POSTAG FEATS HEAD DEPREL PHEAD PDEPREL), `_` marks
//! an empty field, a blank line ends a sentence and `#` lines are comments.
//! HEAD is 1-based with 0 for the root; it is converted to a 0-based
//! dependent -> head map in which root tokens have no entry.

use std::convert::TryFrom;
use std::io as std_io;
use std::path::Path;

use super::{Dataset, Example};
use crate::io::{self as mod_io, invalid_data, FileOpen, FromLine, Read};
use crate::syntax::transition::{Dependencies, Index};

static CONLL_FIELD_DELIMITER: &'static str = "\t";
static CONLL_EMPTY_FIELD: &'static str = "_";
const CONLL_NUM_FIELDS: usize = 10;

/// One token line. Only the columns the trainer consumes are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: usize,
    pub form: String,
    pub cpostag: Option<String>,
    pub postag: Option<String>,
    pub head: Option<usize>,
}

impl Token {
    /// POSTAG, falling back to CPOSTAG.
    pub fn tag(&self) -> &str {
        self.postag
            .as_ref()
            .or(self.cpostag.as_ref())
            .map(|s| s.as_str())
            .unwrap_or(CONLL_EMPTY_FIELD)
    }
}

#[inline]
fn parse_optional_str_field(field: &str) -> Option<String> {
    if field == CONLL_EMPTY_FIELD {
        None
    } else {
        Some(field.to_string())
    }
}

#[inline]
fn parse_optional_usize_field(field: &str) -> Result<Option<usize>, std_io::Error> {
    if field == CONLL_EMPTY_FIELD {
        Ok(None)
    } else {
        field.parse::<usize>().map(Some).map_err(invalid_data)
    }
}

impl FromLine for Token {
    type Err = std_io::Error;

    fn from_line(line: &str) -> Result<Token, Self::Err> {
        let cols: Vec<&str> = line.split(CONLL_FIELD_DELIMITER).collect();
        if cols.len() != CONLL_NUM_FIELDS {
            return Err(invalid_data(format!(
                "expected {} fields, found {}",
                CONLL_NUM_FIELDS,
                cols.len()
            )));
        }
        Ok(Token {
            id: cols[0].parse::<usize>().map_err(invalid_data)?,
            form: cols[1].to_string(),
            cpostag: parse_optional_str_field(cols[3]),
            postag: parse_optional_str_field(cols[4]),
            head: parse_optional_usize_field(cols[6])?,
        })
    }
}

/// Builds an `Example` from the tokens of one sentence.
pub fn to_example(tokens: &[Token]) -> Result<Example, std_io::Error> {
    let mut words = Vec::with_capacity(tokens.len());
    let mut tags = Vec::with_capacity(tokens.len());
    let mut heads = Dependencies::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.id != i + 1 {
            return Err(invalid_data(format!(
                "token id {} is out of sequence (expected {})",
                token.id,
                i + 1
            )));
        }
        words.push(token.form.clone());
        tags.push(token.tag().to_string());
        match token.head {
            Some(0) | None => {}
            Some(head) => {
                let dependent = Index::try_from(i).map_err(invalid_data)?;
                let head = Index::try_from(head - 1).map_err(invalid_data)?;
                heads.add_arc(dependent, head).map_err(invalid_data)?;
            }
        }
    }
    Ok(Example::new(words, tags, heads))
}

pub fn read_upto<R: std_io::BufRead>(
    reader: &mut R,
    num: usize,
    buf: &mut Vec<Example>,
) -> std_io::Result<usize> {
    let mut count = 0;
    let mut line = String::new();
    let mut tokens = vec![];
    while count < num {
        match reader.read_line(&mut line) {
            Ok(0) => {
                if !tokens.is_empty() {
                    buf.push(to_example(&tokens)?);
                    count += 1;
                }
                break;
            }
            Ok(_) => {
                let line_trimmed = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
                if line_trimmed.trim().is_empty() {
                    if !tokens.is_empty() {
                        buf.push(to_example(&tokens)?);
                        tokens.clear();
                        count += 1;
                    }
                } else if !line_trimmed.starts_with('#') {
                    tokens.push(Token::from_line(line_trimmed)?);
                }
            }
            Err(ref e) if e.kind() == std_io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        line.clear();
    }
    Ok(count)
}

pub type Reader<R> = mod_io::Reader<R, Example>;

impl<R: std_io::BufRead> Read for Reader<R> {
    type Item = Example;

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> std_io::Result<usize> {
        read_upto(self.inner_mut(), num, buf)
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> std_io::Result<Dataset<Example>> {
    let mut reader = Reader::<std_io::BufReader<std::fs::File>>::open(path)?;
    let mut buf = vec![];
    reader.read(&mut buf)?;
    Ok(Dataset::from_items(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    static SENTENCES: &'static str = "# sent_id = 1
1\tthe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tdog\tdog\tNOUN\tNN\t_\t3\tnsubj\t_\t_
3\tran\trun\tVERB\t_\t_\t0\troot\t_\t_

1\tHi\thi\tINTJ\tUH\t_\t0\troot\t_\t_
";

    #[test]
    fn test_read_sentences() {
        let mut reader = Reader::new(SENTENCES.as_bytes());
        let mut buf = vec![];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(buf[0].words, vec!["the", "dog", "ran"]);
        assert_eq!(buf[0].tags, vec!["DT", "NN", "VERB"]);
        assert_eq!(buf[0].heads.head(0), Some(1));
        assert_eq!(buf[0].heads.head(1), Some(2));
        assert_eq!(buf[0].heads.head(2), None);
        assert_eq!(buf[1].words, vec!["Hi"]);
        assert!(buf[1].heads.is_empty());
    }

    #[test]
    fn test_read_upto() {
        let mut reader = Reader::new(SENTENCES.as_bytes());
        let mut buf = vec![];
        assert_eq!(reader.read_upto(1, &mut buf).unwrap(), 1);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_head_beyond_index_range() {
        let line = format!("1\ta\ta\tX\tX\t_\t{}\tdep\t_\t_\n", u32::MAX as u64 + 2);
        let mut reader = Reader::new(line.as_bytes());
        let mut buf = vec![];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), std_io::ErrorKind::InvalidData);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_malformed_line() {
        let mut reader = Reader::new("1\tthe\tthe\n".as_bytes());
        let mut buf = vec![];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), std_io::ErrorKind::InvalidData);
    }
}
