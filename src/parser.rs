//! Turns one raw input line into a [`Pipeline`].

use thiserror::Error;

use crate::cmdline::{Pipeline, Stage};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("parse: missing file name after '{0}'")]
    MissingRedirectTarget(char),
    #[error("parse: empty command in pipeline")]
    EmptyStage,
}

fn parse_segment(seg: &str) -> Result<Stage, ParseError> {
    let toks: Vec<&str> = seg.split_whitespace().collect();
    let mut stage = Stage::new(Vec::<String>::new());
    let mut i = 0;
    while i < toks.len() {
        let t = toks[i];
        match t {
            "<" | ">" => {
                let op = if t == "<" { '<' } else { '>' };
                let target = toks.get(i + 1).ok_or(ParseError::MissingRedirectTarget(op))?;
                if op == '<' { stage.input_redirect = Some(target.to_string()); } else { stage.output_redirect = Some(target.to_string()); }
                i += 2;
            }
            tok if tok.len() > 1 && tok.starts_with('<') => { stage.input_redirect = Some(tok[1..].to_string()); i += 1; }
            tok if tok.len() > 1 && tok.starts_with('>') => { stage.output_redirect = Some(tok[1..].to_string()); i += 1; }
            tok => { stage.argv.push(tok.to_string()); i += 1; }
        }
    }
    if stage.argv.is_empty() { return Err(ParseError::EmptyStage); }
    Ok(stage)
}

/// `Ok(None)` for a blank line. A trailing `&`, glued or standalone, marks
/// every stage non-blocking.
pub fn parse(line: &str) -> Result<Option<Pipeline>, ParseError> {
    let mut body = line.trim();
    if body.is_empty() { return Ok(None); }
    let background = match body.strip_suffix('&') {
        Some(rest) => { body = rest.trim_end(); true }
        None => false,
    };
    if body.is_empty() { return Err(ParseError::EmptyStage); }
    let mut stages = body.split('|').map(parse_segment).collect::<Result<Vec<_>, _>>()?;
    if background { for s in stages.iter_mut() { s.blocking = false; } }
    Pipeline::new(stages).map(Some).ok_or(ParseError::EmptyStage)
}
