//! Character-level header scanner.
//!
//! A single left-to-right pass over the header bytes. Delimiters and operator
//! characters are all ASCII, so the scan can work on bytes while keeping
//! multi-byte characters intact inside keys and values.

use tracing::trace;

use crate::error::{ProvisoError, Result};
use crate::types::TypedValue;

use super::clause::Clause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ClauseStart,
    ParameterStart,
    Key,
    DirectiveOrTypedAttribute,
    Argument,
    Value,
}

#[derive(Clone, Copy)]
enum Target {
    Attributes,
    Directives,
}

/// Parse a descriptor header into its clauses.
///
/// The empty string yields no clauses. Within a clause, semicolons separate
/// additional path segments and parameters; commas separate clauses. A key
/// followed by `=` is an attribute, `:=` a directive, and `:Type=` a typed
/// attribute whose declared type is recorded in the clause. Values may be
/// double-quoted (the surrounding quotes are stripped) and may contain
/// backslash escapes.
///
/// Fails when a key is set twice in one clause, when quoting is unbalanced,
/// or when the input ends mid-parameter.
pub fn parse_header(header: &str) -> Result<Vec<Clause>> {
    let mut clauses: Vec<Clause> = Vec::new();
    if header.is_empty() {
        return Ok(clauses);
    }

    let bytes = header.as_bytes();
    let len = bytes.len();

    let mut clause = Clause::default();
    let mut key = String::new();
    let mut target = Target::Attributes;
    let mut state = State::ClauseStart;
    let mut pos = 0usize;
    let mut start = 0usize;
    let mut quoted = false;
    let mut escaped = false;

    loop {
        let current = if pos < len { Some(bytes[pos]) } else { None };
        match state {
            // The start states position the scan without consuming input.
            State::ClauseStart => {
                state = State::ParameterStart;
                continue;
            }
            State::ParameterStart => {
                start = pos;
                state = State::Key;
                continue;
            }
            State::Key => {
                match current {
                    Some(b':') | Some(b'=') => {
                        key = header[start..pos].trim().to_string();
                        start = pos + 1;
                        target = Target::Attributes;
                        state = if current == Some(b':') {
                            State::DirectiveOrTypedAttribute
                        } else {
                            State::Argument
                        };
                    }
                    None | Some(b',') | Some(b';') => {
                        clause.paths.push(header[start..pos].trim().to_string());
                        if current == Some(b',') {
                            clauses.push(std::mem::take(&mut clause));
                            state = State::ClauseStart;
                        } else {
                            state = State::ParameterStart;
                        }
                    }
                    _ => {}
                }
                pos += 1;
            }
            State::DirectiveOrTypedAttribute => {
                // Text between the colon and the equals sign is a type tag;
                // an immediate equals sign makes the parameter a directive.
                if current == Some(b'=') {
                    if start != pos {
                        clause
                            .declared_types
                            .insert(key.clone(), header[start..pos].trim().to_string());
                    } else {
                        target = Target::Directives;
                    }
                    state = State::Argument;
                    start = pos + 1;
                }
                pos += 1;
            }
            State::Argument => {
                if current == Some(b'"') {
                    quoted = true;
                    pos += 1;
                    state = State::Value;
                } else {
                    quoted = false;
                    match current {
                        Some(c) if c.is_ascii_whitespace() => pos += 1,
                        _ => state = State::Value,
                    }
                }
            }
            State::Value => {
                if escaped {
                    escaped = false;
                } else {
                    match current {
                        Some(b'\\') => escaped = true,
                        Some(b'"') if quoted => quoted = false,
                        None | Some(b';') | Some(b',') if !quoted => {
                            let mut value = header[start..pos].trim().to_string();
                            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                                value = value[1..value.len() - 1].to_string();
                            }
                            let duplicate = match target {
                                Target::Attributes => clause
                                    .attributes
                                    .insert(key.clone(), TypedValue::Str(value))
                                    .is_some(),
                                Target::Directives => {
                                    clause.directives.insert(key.clone(), value).is_some()
                                }
                            };
                            if duplicate {
                                return Err(ProvisoError::duplicate_key(key.as_str(), header));
                            }
                            if current == Some(b';') {
                                state = State::ParameterStart;
                            } else {
                                if current == Some(b',') {
                                    clauses.push(std::mem::take(&mut clause));
                                }
                                state = State::ClauseStart;
                            }
                        }
                        _ => {}
                    }
                }
                pos += 1;
            }
        }

        if current.is_none() {
            break;
        }
    }

    if !matches!(state, State::ClauseStart | State::ParameterStart) {
        return Err(ProvisoError::truncated_header(header));
    }

    clauses.push(clause);
    trace!(clauses = clauses.len(), "parsed header");
    Ok(clauses)
}
